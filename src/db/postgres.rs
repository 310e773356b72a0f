use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::store::{EntryStore, StoreError, StoreResult};
use crate::models::entry::{DailyEntry, NewEntry};
use crate::models::leaderboard::LeaderboardMetric;
use crate::models::user::User;

#[derive(Clone)]
pub struct PgEntryStore {
    db: PgPool,
}

impl PgEntryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl EntryStore for PgEntryStore {
    async fn find_entry(&self, user_id: &str, date: NaiveDate) -> StoreResult<Vec<DailyEntry>> {
        let entries = sqlx::query_as::<_, DailyEntry>(
            "SELECT * FROM entries WHERE user_id = $1 AND entry_date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    async fn insert_entry(&self, entry: NewEntry) -> StoreResult<DailyEntry> {
        let result = sqlx::query_as::<_, DailyEntry>(
            r#"
            INSERT INTO entries (
                id, user_id, entry_date, miles_driven, electricity_used,
                running_distance, walking_distance, score
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&entry.user_id)
        .bind(entry.entry_date)
        .bind(entry.miles_driven)
        .bind(entry.electricity_used)
        .bind(entry.running_distance)
        .bind(entry.walking_distance)
        .bind(entry.score)
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(row) => Ok(row),
            // uq_entries_user_day
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_entry_activity(
        &self,
        id: Uuid,
        running_distance: f64,
        walking_distance: f64,
        score: f64,
    ) -> StoreResult<DailyEntry> {
        sqlx::query_as::<_, DailyEntry>(
            r#"
            UPDATE entries SET
                running_distance = $2,
                walking_distance = $3,
                score = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(running_distance)
        .bind(walking_distance)
        .bind(score)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    async fn entries_for_user(&self, user_id: &str) -> StoreResult<Vec<DailyEntry>> {
        let entries = sqlx::query_as::<_, DailyEntry>(
            "SELECT * FROM entries WHERE user_id = $1 ORDER BY entry_date ASC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    async fn top_entries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        metric: LeaderboardMetric,
        limit: i64,
    ) -> StoreResult<Vec<DailyEntry>> {
        // Column and direction come from the metric enum, never from input.
        let sql = format!(
            r#"
            SELECT * FROM entries
            WHERE entry_date >= $1 AND entry_date < $2
            ORDER BY {} {}, created_at ASC
            LIMIT $3
            "#,
            metric.column(),
            if metric.descending() { "DESC" } else { "ASC" },
        );

        let entries = sqlx::query_as::<_, DailyEntry>(&sql)
            .bind(start)
            .bind(end)
            .bind(limit)
            .fetch_all(&self.db)
            .await?;

        Ok(entries)
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }
}
