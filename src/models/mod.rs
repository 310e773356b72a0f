pub mod entry;
pub mod leaderboard;
pub mod user;
