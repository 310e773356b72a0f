pub mod entries;
pub mod health;
pub mod leaderboard;
pub mod users;
