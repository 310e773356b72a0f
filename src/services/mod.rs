pub mod clock;
pub mod history;
pub mod inflight;
pub mod leaderboard;
pub mod lifecycle;
pub mod score;
pub mod sensor;
