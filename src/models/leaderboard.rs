use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entry::DailyEntry;
use super::user::User;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardMetric {
    #[default]
    Score,
    MilesDriven,
    ElectricityUsed,
}

impl LeaderboardMetric {
    /// Column the store orders by.
    pub fn column(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::MilesDriven => "miles_driven",
            Self::ElectricityUsed => "electricity_used",
        }
    }

    /// Score ranks highest first; the raw quantities rank lowest first.
    pub fn descending(self) -> bool {
        matches!(self, Self::Score)
    }

    pub fn value(self, entry: &DailyEntry) -> f64 {
        match self {
            Self::Score => entry.score,
            Self::MilesDriven => entry.miles_driven,
            Self::ElectricityUsed => entry.electricity_used,
        }
    }
}

/// Read-only projection of an entry joined with its owner's display fields.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub profile_image_url: String,
    pub metric: LeaderboardMetric,
    pub value: f64,
    pub score: f64,
    pub miles_driven: f64,
    pub electricity_used: f64,
}

impl LeaderboardEntry {
    /// Blank display fields on an existing user fall back to "Unknown" and an
    /// empty avatar.
    pub fn project(entry: &DailyEntry, user: &User, metric: LeaderboardMetric) -> Self {
        let name = match user.name.trim() {
            "" => "Unknown".to_string(),
            name => name.to_string(),
        };
        Self {
            id: entry.id,
            user_id: entry.user_id.clone(),
            name,
            profile_image_url: user.profile_image_url.clone().unwrap_or_default(),
            metric,
            value: metric.value(entry),
            score: entry.score,
            miles_driven: entry.miles_driven,
            electricity_used: entry.electricity_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn entry() -> DailyEntry {
        let now = Utc::now();
        DailyEntry {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            entry_date: NaiveDate::from_ymd_opt(2024, 4, 22).unwrap(),
            miles_driven: 12.0,
            electricity_used: 3.5,
            running_distance: 0.0,
            walking_distance: 0.0,
            score: 12.455,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_metric_ordering_direction() {
        assert!(LeaderboardMetric::Score.descending());
        assert!(!LeaderboardMetric::MilesDriven.descending());
        assert!(!LeaderboardMetric::ElectricityUsed.descending());
    }

    #[test]
    fn test_metric_deserializes_snake_case() {
        let m: LeaderboardMetric = serde_json::from_str(r#""miles_driven""#).unwrap();
        assert_eq!(m, LeaderboardMetric::MilesDriven);
        assert_eq!(m.column(), "miles_driven");
    }

    fn user(name: &str, avatar: Option<&str>) -> User {
        User {
            id: "u1".into(),
            name: name.into(),
            email: "u1@example.com".into(),
            profile_image_url: avatar.map(Into::into),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_project_blank_fields_use_defaults() {
        let row = LeaderboardEntry::project(
            &entry(),
            &user("  ", None),
            LeaderboardMetric::ElectricityUsed,
        );
        assert_eq!(row.name, "Unknown");
        assert_eq!(row.profile_image_url, "");
        assert_eq!(row.value, 3.5);
    }

    #[test]
    fn test_project_with_user_copies_display_fields() {
        let ada = user("Ada", Some("https://img/u1.jpg"));
        let row = LeaderboardEntry::project(&entry(), &ada, LeaderboardMetric::Score);
        assert_eq!(row.name, "Ada");
        assert_eq!(row.profile_image_url, "https://img/u1.jpg");
        assert_eq!(row.value, 12.455);
    }
}
