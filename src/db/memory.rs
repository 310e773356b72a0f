use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{EntryStore, StoreError, StoreResult};
use crate::models::entry::{DailyEntry, NewEntry};
use crate::models::leaderboard::LeaderboardMetric;
use crate::models::user::User;

/// In-process store for local runs without Postgres. Enforces the same
/// (user, day) uniqueness as the `uq_entries_user_day` index.
#[derive(Clone, Default)]
pub struct MemoryEntryStore {
    inner: Arc<RwLock<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    entries: Vec<DailyEntry>,
    users: HashMap<String, User>,
    unavailable: Option<String>,
    read_only: Option<String>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn put_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id.clone(), user);
    }

    /// Makes every subsequent call fail with `Unavailable` until cleared.
    #[cfg(test)]
    pub async fn set_unavailable(&self, reason: Option<&str>) {
        self.inner.write().await.unavailable = reason.map(String::from);
    }

    /// Makes inserts and updates fail with `Unavailable`; reads still work.
    #[cfg(test)]
    pub async fn set_read_only(&self, reason: Option<&str>) {
        self.inner.write().await.read_only = reason.map(String::from);
    }

    #[cfg(test)]
    pub async fn entry_count(&self) -> usize {
        self.inner.read().await.entries.len()
    }
}

impl MemoryInner {
    fn check(&self) -> StoreResult<()> {
        match &self.unavailable {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn check_writable(&self) -> StoreResult<()> {
        self.check()?;
        match &self.read_only {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

impl EntryStore for MemoryEntryStore {
    async fn find_entry(&self, user_id: &str, date: NaiveDate) -> StoreResult<Vec<DailyEntry>> {
        let inner = self.inner.read().await;
        inner.check()?;
        Ok(inner
            .entries
            .iter()
            .filter(|e| e.user_id == user_id && e.entry_date == date)
            .cloned()
            .collect())
    }

    async fn insert_entry(&self, entry: NewEntry) -> StoreResult<DailyEntry> {
        let mut inner = self.inner.write().await;
        inner.check_writable()?;

        if inner
            .entries
            .iter()
            .any(|e| e.user_id == entry.user_id && e.entry_date == entry.entry_date)
        {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let row = DailyEntry {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            entry_date: entry.entry_date,
            miles_driven: entry.miles_driven,
            electricity_used: entry.electricity_used,
            running_distance: entry.running_distance,
            walking_distance: entry.walking_distance,
            score: entry.score,
            created_at: now,
            updated_at: now,
        };
        inner.entries.push(row.clone());
        Ok(row)
    }

    async fn update_entry_activity(
        &self,
        id: Uuid,
        running_distance: f64,
        walking_distance: f64,
        score: f64,
    ) -> StoreResult<DailyEntry> {
        let mut inner = self.inner.write().await;
        inner.check_writable()?;

        let row = inner
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound(id))?;
        row.running_distance = running_distance;
        row.walking_distance = walking_distance;
        row.score = score;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn entries_for_user(&self, user_id: &str) -> StoreResult<Vec<DailyEntry>> {
        let inner = self.inner.read().await;
        inner.check()?;

        let mut entries: Vec<DailyEntry> = inner
            .entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.entry_date);
        Ok(entries)
    }

    async fn top_entries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        metric: LeaderboardMetric,
        limit: i64,
    ) -> StoreResult<Vec<DailyEntry>> {
        let inner = self.inner.read().await;
        inner.check()?;

        let mut entries: Vec<DailyEntry> = inner
            .entries
            .iter()
            .filter(|e| e.entry_date >= start && e.entry_date < end)
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            let ord = metric.value(a).total_cmp(&metric.value(b));
            if metric.descending() {
                ord.reverse()
            } else {
                ord
            }
        });
        entries.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        Ok(entries)
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        inner.check()?;
        Ok(inner.users.get(id).cloned())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner.read().await.check()
    }
}
