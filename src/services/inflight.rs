use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use chrono::NaiveDate;

/// Identifies the single entry a user may hold for a day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub user_id: String,
    pub date: NaiveDate,
}

impl EntryKey {
    pub fn new(user_id: &str, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.to_string(),
            date,
        }
    }
}

/// Tracks submissions currently in progress so rapid repeat requests for the
/// same (user, day) cannot both reach the store.
///
/// In-memory only (single-instance deployments); the store's unique index
/// still backs this up across instances.
#[derive(Clone, Default)]
pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<EntryKey>>>,
}

/// Held while a submission runs. Releases the key on drop, including when the
/// submission fails or the caller's future is dropped.
pub struct InFlightPermit {
    keys: Arc<Mutex<HashSet<EntryKey>>>,
    key: EntryKey,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` if the key is already being worked on.
    pub fn try_acquire(&self, key: EntryKey) -> Option<InFlightPermit> {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        if !keys.insert(key.clone()) {
            tracing::debug!(
                user_id = %key.user_id,
                entry_date = %key.date,
                "Submission already in flight"
            );
            return None;
        }
        Some(InFlightPermit {
            keys: self.keys.clone(),
            key,
        })
    }

    #[cfg(test)]
    pub fn is_in_flight(&self, key: &EntryKey) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(key)
    }
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        keys.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(user: &str, day: u32) -> EntryKey {
        EntryKey::new(user, NaiveDate::from_ymd_opt(2024, 4, day).unwrap())
    }

    #[test]
    fn test_second_acquire_blocked_while_held() {
        let guard = InFlightGuard::new();
        let permit = guard.try_acquire(key("u1", 22));
        assert!(permit.is_some());
        assert!(guard.try_acquire(key("u1", 22)).is_none());
    }

    #[test]
    fn test_drop_releases_key() {
        let guard = InFlightGuard::new();
        {
            let _permit = guard.try_acquire(key("u1", 22)).unwrap();
            assert!(guard.is_in_flight(&key("u1", 22)));
        }
        assert!(!guard.is_in_flight(&key("u1", 22)));
        assert!(guard.try_acquire(key("u1", 22)).is_some());
    }

    #[test]
    fn test_different_keys_are_independent() {
        let guard = InFlightGuard::new();
        let _a = guard.try_acquire(key("u1", 22)).unwrap();
        assert!(guard.try_acquire(key("u2", 22)).is_some());
        assert!(guard.try_acquire(key("u1", 23)).is_some());
    }
}
