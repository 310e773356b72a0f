//! One entry per user per day.
//!
//! The manager owns the "held" view of each user's entry for today: the score
//! a client is currently shown. Each (user, day) has its own slot with its own
//! lock, so a sensor amendment finishing on another task never races a reader
//! or another amendment of the same entry, and never waits on other users.
//! Every operation takes the user id explicitly.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::clock::{start_of_day, Clock};
use super::inflight::{EntryKey, InFlightGuard};
use super::score::{compute_score, incorporate_running_distance, validate_quantity};
use super::sensor::{ActivitySensor, DistanceKind};
use crate::db::{EntryStore, StoreError};
use crate::error::{AppError, AppResult};
use crate::models::entry::{DailyEntry, NewEntry};

type HeldSlot = Arc<Mutex<DailyEntry>>;

pub struct EntryLifecycleManager<S> {
    store: S,
    clock: Arc<dyn Clock>,
    held: RwLock<HashMap<EntryKey, HeldSlot>>,
    in_flight: InFlightGuard,
}

impl<S: EntryStore> EntryLifecycleManager<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            held: RwLock::new(HashMap::new()),
            in_flight: InFlightGuard::new(),
        }
    }

    fn today_key(&self, user_id: &str) -> EntryKey {
        EntryKey::new(user_id, self.clock.today())
    }

    async fn slot(&self, key: &EntryKey) -> Option<HeldSlot> {
        self.held.read().await.get(key).cloned()
    }

    /// Score currently shown for the user's entry today, if any.
    pub async fn current_score(&self, user_id: &str) -> Option<f64> {
        let slot = self.slot(&self.today_key(user_id)).await?;
        let score = slot.lock().await.score;
        Some(score)
    }

    async fn hold(&self, key: EntryKey, entry: DailyEntry) {
        let slot = {
            let mut held = self.held.write().await;
            // Yesterday's keys can never be amended again.
            held.retain(|k, _| k.date >= key.date);
            match held.get(&key) {
                Some(slot) => slot.clone(),
                None => {
                    held.insert(key, Arc::new(Mutex::new(entry)));
                    return;
                }
            }
        };

        // A read that started before an amendment finished must not roll it back.
        let mut current = slot.lock().await;
        if entry.id != current.id || entry.updated_at >= current.updated_at {
            *current = entry;
        }
    }

    /// Reads the user's entry for today. Holds its score when found; a miss
    /// leaves any held score untouched.
    pub async fn fetch_today_entry(&self, user_id: &str) -> AppResult<Option<DailyEntry>> {
        let key = self.today_key(user_id);

        let rows = self
            .store
            .find_entry(user_id, key.date)
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id = %user_id,
                    entry_date = %key.date,
                    error = %e,
                    "Failed to fetch today's entry"
                );
                AppError::FetchFailed(e.to_string())
            })?;

        if rows.len() > 1 {
            tracing::warn!(
                user_id = %user_id,
                entry_date = %key.date,
                count = rows.len(),
                "Multiple entries stored for one day, using the first"
            );
        }

        let entry = rows.into_iter().next();
        if let Some(entry) = &entry {
            self.hold(key, entry.clone()).await;
        }
        Ok(entry)
    }

    /// Records today's driving and electricity for `user_id`.
    ///
    /// `None` (or an empty id) means there is no authenticated session; the
    /// store is not touched. On a failed write nothing is held.
    pub async fn submit(
        &self,
        user_id: Option<&str>,
        miles_driven: f64,
        electricity_used: f64,
    ) -> AppResult<DailyEntry> {
        let user_id = user_id
            .filter(|id| !id.is_empty())
            .ok_or(AppError::InvalidSession)?;

        let miles_driven =
            validate_quantity("miles_driven", miles_driven).map_err(AppError::Validation)?;
        let electricity_used = validate_quantity("electricity_used", electricity_used)
            .map_err(AppError::Validation)?;

        let key = self.today_key(user_id);
        let _permit = self.in_flight.try_acquire(key.clone()).ok_or_else(|| {
            AppError::Conflict("A submission for today is already in progress".into())
        })?;

        let existing = self
            .store
            .find_entry(user_id, key.date)
            .await
            .map_err(|e| AppError::FetchFailed(e.to_string()))?;
        if let Some(entry) = existing.into_iter().next() {
            self.hold(key, entry).await;
            return Err(AppError::Conflict(
                "An entry has already been recorded for today".into(),
            ));
        }

        let new_entry = NewEntry {
            user_id: user_id.to_string(),
            entry_date: key.date,
            miles_driven,
            electricity_used,
            running_distance: 0.0,
            walking_distance: 0.0,
            score: compute_score(miles_driven, electricity_used),
        };

        let entry = self.store.insert_entry(new_entry).await.map_err(|e| match e {
            StoreError::Duplicate => {
                AppError::Conflict("An entry has already been recorded for today".into())
            }
            e => {
                tracing::error!(
                    user_id = %user_id,
                    entry_date = %key.date,
                    error = %e,
                    "Failed to save entry"
                );
                AppError::SaveFailed(e.to_string())
            }
        })?;

        tracing::info!(
            user_id = %user_id,
            entry_date = %entry.entry_date,
            score = entry.score,
            "Daily entry recorded"
        );

        self.hold(key, entry.clone()).await;
        Ok(entry)
    }

    /// Adds `running_km` to the held score and persists it. Returns `None`
    /// without touching the store when nothing is held for today.
    pub async fn amend_with_running_distance(
        &self,
        user_id: &str,
        running_km: f64,
    ) -> AppResult<Option<f64>> {
        let running_km =
            validate_quantity("running_distance", running_km).map_err(AppError::Validation)?;
        let key = self.today_key(user_id);

        let Some(slot) = self.slot(&key).await else {
            return Ok(None);
        };
        let mut current = slot.lock().await;
        let score = self.apply_running_km(&key, &mut current, running_km).await?;
        Ok(Some(score))
    }

    /// Persists `running_km` on top of `current`, then updates it in place.
    /// Callers hold the slot lock for the whole read-modify-write.
    async fn apply_running_km(
        &self,
        key: &EntryKey,
        current: &mut DailyEntry,
        running_km: f64,
    ) -> AppResult<f64> {
        let score = incorporate_running_distance(current.score, running_km);
        let updated = self
            .store
            .update_entry_activity(
                current.id,
                current.running_distance + running_km,
                current.walking_distance,
                score,
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id = %key.user_id,
                    error = %e,
                    "Failed to save running distance"
                );
                AppError::SaveFailed(e.to_string())
            })?;

        tracing::info!(
            user_id = %key.user_id,
            entry_date = %key.date,
            running_km = running_km,
            score = updated.score,
            "Entry amended with running distance"
        );

        *current = updated;
        Ok(current.score)
    }

    /// Drops the held entry for today and reloads it from the store.
    pub async fn reset(&self, user_id: &str) -> AppResult<Option<DailyEntry>> {
        let key = self.today_key(user_id);
        self.held.write().await.remove(&key);
        self.fetch_today_entry(user_id).await
    }

    /// Reads today's walking/running distance from `sensor` and folds it into
    /// the held score.
    ///
    /// The sensor reports a cumulative total for the day, so only the part
    /// not yet recorded on the entry is applied. The recorded distance is read
    /// and updated under the same slot lock.
    pub async fn sync_running_distance<A: ActivitySensor>(
        &self,
        user_id: &str,
        sensor: &A,
    ) -> AppResult<Option<f64>> {
        let authorized = sensor
            .request_authorization(user_id)
            .await
            .map_err(|e| AppError::SensorFailed(e.to_string()))?;
        if !authorized {
            tracing::warn!(user_id = %user_id, "Activity sensor permission denied");
            return Err(AppError::SensorPermissionDenied);
        }

        let now = self.clock.now();
        let start = start_of_day(now.date_naive());
        let meters = sensor
            .cumulative_distance(user_id, DistanceKind::WalkingRunning, start, now)
            .await
            .map_err(|e| AppError::SensorFailed(e.to_string()))?;
        if !meters.is_finite() || meters < 0.0 {
            return Err(AppError::SensorFailed(format!(
                "invalid distance reading: {}",
                meters
            )));
        }

        let km = meters / 1000.0;
        let key = self.today_key(user_id);
        let Some(slot) = self.slot(&key).await else {
            return Ok(None);
        };

        let mut current = slot.lock().await;
        let increment = (km - current.running_distance).max(0.0);
        let score = self.apply_running_km(&key, &mut current, increment).await?;
        Ok(Some(score))
    }
}
