use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One user's recorded activity and derived score for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DailyEntry {
    pub id: Uuid,
    pub user_id: String,
    pub entry_date: NaiveDate,
    pub miles_driven: f64,
    pub electricity_used: f64,
    pub running_distance: f64,
    pub walking_distance: f64,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload; the store assigns the id and timestamps.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub user_id: String,
    pub entry_date: NaiveDate,
    pub miles_driven: f64,
    pub electricity_used: f64,
    pub running_distance: f64,
    pub walking_distance: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub label: String,
    pub score: f64,
    pub miles_driven: f64,
    pub electricity_used: f64,
}

impl From<&DailyEntry> for HistoryPoint {
    fn from(e: &DailyEntry) -> Self {
        Self {
            date: e.entry_date,
            label: e.entry_date.format("%m/%d/%Y").to_string(),
            score: e.score,
            miles_driven: e.miles_driven,
            electricity_used: e.electricity_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_label_is_month_day_year() {
        let now = Utc::now();
        let entry = DailyEntry {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            entry_date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            miles_driven: 10.0,
            electricity_used: 20.0,
            running_distance: 0.0,
            walking_distance: 0.0,
            score: 24.9,
            created_at: now,
            updated_at: now,
        };
        let point = HistoryPoint::from(&entry);
        assert_eq!(point.label, "04/02/2024");
        assert_eq!(point.miles_driven, 10.0);
        assert_eq!(point.electricity_used, 20.0);
    }
}
