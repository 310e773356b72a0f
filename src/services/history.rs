use crate::db::EntryStore;
use crate::error::{AppError, AppResult};
use crate::models::entry::HistoryPoint;

/// Every entry the user has recorded, oldest day first.
pub async fn user_history<S: EntryStore>(store: &S, user_id: &str) -> AppResult<Vec<HistoryPoint>> {
    let entries = store.entries_for_user(user_id).await.map_err(|e| {
        tracing::error!(user_id = %user_id, error = %e, "Failed to load history");
        AppError::FetchFailed(e.to_string())
    })?;

    Ok(entries.iter().map(HistoryPoint::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryEntryStore;
    use crate::models::entry::NewEntry;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_history_is_chronological_and_scoped_to_user() {
        let store = MemoryEntryStore::new();
        for (user, day, score) in [("u1", 23, 2.0), ("u1", 21, 1.0), ("u2", 22, 9.0)] {
            store
                .insert_entry(NewEntry {
                    user_id: user.into(),
                    entry_date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
                    miles_driven: 0.0,
                    electricity_used: 0.0,
                    running_distance: 0.0,
                    walking_distance: 0.0,
                    score,
                })
                .await
                .unwrap();
        }

        let points = user_history(&store, "u1").await.unwrap();
        let labels: Vec<_> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["04/21/2024", "04/23/2024"]);
        assert_eq!(points[1].score, 2.0);
    }

    #[tokio::test]
    async fn test_history_for_unknown_user_is_empty() {
        let store = MemoryEntryStore::new();
        assert!(user_history(&store, "nobody").await.unwrap().is_empty());
    }
}
