use chrono::NaiveDate;
use futures_util::future::join_all;

use crate::db::EntryStore;
use crate::error::{AppError, AppResult};
use crate::models::leaderboard::{LeaderboardEntry, LeaderboardMetric};

/// Top entries recorded on `date`, ranked by the store on `metric`, each
/// joined with its owner's display name and avatar.
///
/// User lookups run concurrently; the store's ranking order is kept. A row
/// whose owner cannot be loaded, or no longer exists, is dropped.
pub async fn daily_leaderboard<S: EntryStore>(
    store: &S,
    date: NaiveDate,
    metric: LeaderboardMetric,
    limit: i64,
) -> AppResult<Vec<LeaderboardEntry>> {
    let end = date
        .succ_opt()
        .ok_or_else(|| AppError::Validation("date is out of range".into()))?;

    let entries = store
        .top_entries(date, end, metric, limit)
        .await
        .map_err(|e| {
            tracing::error!(
                date = %date,
                metric = metric.column(),
                error = %e,
                "Failed to load leaderboard"
            );
            AppError::FetchFailed(e.to_string())
        })?;

    let users = join_all(entries.iter().map(|e| store.find_user(&e.user_id))).await;

    let rows = entries
        .iter()
        .zip(users)
        .filter_map(|(entry, user)| match user {
            Ok(Some(user)) => Some(LeaderboardEntry::project(entry, &user, metric)),
            Ok(None) => {
                tracing::warn!(user_id = %entry.user_id, "User record missing, skipping row");
                None
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %entry.user_id,
                    error = %e,
                    "Failed to fetch user details"
                );
                None
            }
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryEntryStore;
    use crate::models::entry::NewEntry;
    use crate::models::user::User;
    use chrono::Utc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    async fn seed(store: &MemoryEntryStore, user: &str, d: u32, miles: f64, score: f64) {
        store
            .insert_entry(NewEntry {
                user_id: user.into(),
                entry_date: day(d),
                miles_driven: miles,
                electricity_used: 0.0,
                running_distance: 0.0,
                walking_distance: 0.0,
                score,
            })
            .await
            .unwrap();
    }

    async fn put_user(store: &MemoryEntryStore, id: &str, name: &str) {
        store
            .put_user(User {
                id: id.into(),
                name: name.into(),
                email: format!("{}@example.com", id),
                profile_image_url: Some(format!("https://img/{}.jpg", id)),
                created_at: Utc::now(),
            })
            .await;
    }

    #[tokio::test]
    async fn test_ranks_by_score_and_joins_users() {
        let store = MemoryEntryStore::new();
        put_user(&store, "a", "Alice").await;
        put_user(&store, "b", "Bob").await;
        seed(&store, "a", 22, 1.0, 5.0).await;
        seed(&store, "b", 22, 9.0, 15.0).await;
        seed(&store, "c", 22, 3.0, 10.0).await;
        seed(&store, "a", 23, 0.0, 50.0).await;

        let rows = daily_leaderboard(&store, day(22), LeaderboardMetric::Score, 10)
            .await
            .unwrap();

        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        // "c" has no user record and is left out.
        assert_eq!(names, vec!["Bob", "Alice"]);
        assert_eq!(rows[0].profile_image_url, "https://img/b.jpg");
        assert_eq!(rows[0].value, 15.0);
    }

    #[tokio::test]
    async fn test_quantity_metric_ranks_ascending_with_limit() {
        let store = MemoryEntryStore::new();
        for id in ["a", "b", "c"] {
            put_user(&store, id, id).await;
        }
        seed(&store, "a", 22, 5.0, 0.0).await;
        seed(&store, "b", 22, 1.0, 0.0).await;
        seed(&store, "c", 22, 3.0, 0.0).await;

        let rows = daily_leaderboard(&store, day(22), LeaderboardMetric::MilesDriven, 2)
            .await
            .unwrap();

        let users: Vec<_> = rows.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(users, vec!["b", "c"]);
        assert_eq!(rows[0].value, 1.0);
    }

    #[tokio::test]
    async fn test_store_failure_is_fetch_failed() {
        let store = MemoryEntryStore::new();
        store.set_unavailable(Some("down")).await;

        let err = daily_leaderboard(&store, day(22), LeaderboardMetric::Score, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::FetchFailed(_)));
    }
}
