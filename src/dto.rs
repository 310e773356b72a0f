//! # Carbon API — Request/Response DTOs
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - Field validation is expressed via `validator` derive macros

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::entry::DailyEntry;
use crate::models::leaderboard::{LeaderboardEntry, LeaderboardMetric};

// ============================================================================
// Entries
// ============================================================================

/// POST /api/entries
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitEntryRequest {
    #[serde(default)]
    #[validate(range(min = 0.0, message = "miles_driven must not be negative"))]
    pub miles_driven: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "electricity_used must not be negative"))]
    pub electricity_used: f64,
}

/// POST /api/entries/today/activity
///
/// `distance_meters` is the cumulative walking/running distance the device
/// read for today. When absent the server asks the activity bridge.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ActivitySyncRequest {
    #[validate(range(min = 0.0, message = "distance_meters must not be negative"))]
    pub distance_meters: Option<f64>,
}

/// GET /api/entries/today, POST /api/entries/today/reset
#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub entry_exists: bool,
    pub entry: Option<DailyEntry>,
    pub current_score: Option<f64>,
}

/// POST /api/entries
#[derive(Debug, Serialize)]
pub struct SubmitEntryResponse {
    pub entry: DailyEntry,
    pub current_score: Option<f64>,
    /// Set when the entry was saved but the follow-up activity read failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_error: Option<String>,
}

/// POST /api/entries/today/activity
#[derive(Debug, Serialize)]
pub struct ActivitySyncResponse {
    pub entry_exists: bool,
    pub current_score: Option<f64>,
}

// ============================================================================
// Leaderboard
// ============================================================================

/// GET /api/leaderboard?date=YYYY-MM-DD&metric=score
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub metric: LeaderboardMetric,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub date: NaiveDate,
    pub metric: LeaderboardMetric,
    pub entries: Vec<LeaderboardEntry>,
}
