//! Persistence seam for daily entries and the user records they are joined
//! against. Ranking and ordering are the store's job; callers receive rows
//! already sorted.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use super::{MemoryEntryStore, PgEntryStore};
use crate::models::entry::{DailyEntry, NewEntry};
use crate::models::leaderboard::LeaderboardMetric;
use crate::models::user::User;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("an entry already exists for this user and day")]
    Duplicate,

    #[error("entry {0} not found")]
    NotFound(Uuid),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait EntryStore: Send + Sync {
    /// Entries keyed by (user, day). More than one row means the uniqueness
    /// invariant was broken upstream.
    fn find_entry(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> impl Future<Output = StoreResult<Vec<DailyEntry>>> + Send;

    fn insert_entry(&self, entry: NewEntry) -> impl Future<Output = StoreResult<DailyEntry>> + Send;

    fn update_entry_activity(
        &self,
        id: Uuid,
        running_distance: f64,
        walking_distance: f64,
        score: f64,
    ) -> impl Future<Output = StoreResult<DailyEntry>> + Send;

    /// All of a user's entries, oldest day first.
    fn entries_for_user(
        &self,
        user_id: &str,
    ) -> impl Future<Output = StoreResult<Vec<DailyEntry>>> + Send;

    /// Entries with `start <= entry_date < end`, ordered by `metric`
    /// (descending for score, ascending otherwise) and capped at `limit`.
    fn top_entries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        metric: LeaderboardMetric,
        limit: i64,
    ) -> impl Future<Output = StoreResult<Vec<DailyEntry>>> + Send;

    fn find_user(&self, id: &str) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    fn ping(&self) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Runtime-selected store: Postgres when `DATABASE_URL` is set, memory otherwise.
#[derive(Clone)]
pub enum StoreBackend {
    Postgres(PgEntryStore),
    Memory(MemoryEntryStore),
}

impl StoreBackend {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl EntryStore for StoreBackend {
    async fn find_entry(&self, user_id: &str, date: NaiveDate) -> StoreResult<Vec<DailyEntry>> {
        match self {
            Self::Postgres(s) => s.find_entry(user_id, date).await,
            Self::Memory(s) => s.find_entry(user_id, date).await,
        }
    }

    async fn insert_entry(&self, entry: NewEntry) -> StoreResult<DailyEntry> {
        match self {
            Self::Postgres(s) => s.insert_entry(entry).await,
            Self::Memory(s) => s.insert_entry(entry).await,
        }
    }

    async fn update_entry_activity(
        &self,
        id: Uuid,
        running_distance: f64,
        walking_distance: f64,
        score: f64,
    ) -> StoreResult<DailyEntry> {
        match self {
            Self::Postgres(s) => {
                s.update_entry_activity(id, running_distance, walking_distance, score)
                    .await
            }
            Self::Memory(s) => {
                s.update_entry_activity(id, running_distance, walking_distance, score)
                    .await
            }
        }
    }

    async fn entries_for_user(&self, user_id: &str) -> StoreResult<Vec<DailyEntry>> {
        match self {
            Self::Postgres(s) => s.entries_for_user(user_id).await,
            Self::Memory(s) => s.entries_for_user(user_id).await,
        }
    }

    async fn top_entries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        metric: LeaderboardMetric,
        limit: i64,
    ) -> StoreResult<Vec<DailyEntry>> {
        match self {
            Self::Postgres(s) => s.top_entries(start, end, metric, limit).await,
            Self::Memory(s) => s.top_entries(start, end, metric, limit).await,
        }
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        match self {
            Self::Postgres(s) => s.find_user(id).await,
            Self::Memory(s) => s.find_user(id).await,
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        match self {
            Self::Postgres(s) => s.ping().await,
            Self::Memory(s) => s.ping().await,
        }
    }
}
