use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::{
    ActivitySyncRequest, ActivitySyncResponse, SubmitEntryRequest, SubmitEntryResponse,
    TodayResponse,
};
use crate::error::{AppError, AppResult};
use crate::models::entry::{DailyEntry, HistoryPoint};
use crate::services::history::user_history;
use crate::services::sensor::ReportedDistance;
use crate::AppState;

async fn today_response(
    state: &AppState,
    user_id: &str,
    entry: Option<DailyEntry>,
) -> TodayResponse {
    TodayResponse {
        entry_exists: entry.is_some(),
        current_score: state.entries.current_score(user_id).await,
        entry,
    }
}

pub async fn get_today(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<TodayResponse>> {
    let user_id = auth_user.session_id().ok_or(AppError::InvalidSession)?;
    let entry = state.entries.fetch_today_entry(user_id).await?;
    Ok(Json(today_response(&state, user_id, entry).await))
}

/// Records today's entry, then reads the activity bridge (when configured)
/// and folds the walking/running distance in. A bridge failure does not undo
/// the saved entry; it is reported alongside it.
pub async fn submit_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<SubmitEntryRequest>,
) -> AppResult<Json<SubmitEntryResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let entry = state
        .entries
        .submit(auth_user.session_id(), body.miles_driven, body.electricity_used)
        .await?;

    let mut sensor_error = None;
    if let Some(sensor) = state.activity_sensor.as_ref() {
        if let Err(e) = state
            .entries
            .sync_running_distance(&entry.user_id, sensor)
            .await
        {
            tracing::warn!(
                user_id = %entry.user_id,
                error = %e,
                "Activity sync after submit failed"
            );
            sensor_error = Some(e.to_string());
        }
    }

    Ok(Json(SubmitEntryResponse {
        current_score: state.entries.current_score(&entry.user_id).await,
        entry,
        sensor_error,
    }))
}

pub async fn sync_activity(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ActivitySyncRequest>,
) -> AppResult<Json<ActivitySyncResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let user_id = auth_user.session_id().ok_or(AppError::InvalidSession)?;

    // Load today's entry so an amendment applies after a restart too.
    let entry = state.entries.fetch_today_entry(user_id).await?;

    let current_score = match (body.distance_meters, state.activity_sensor.as_ref()) {
        (Some(meters), _) => {
            state
                .entries
                .sync_running_distance(user_id, &ReportedDistance { meters })
                .await?
        }
        (None, Some(sensor)) => state.entries.sync_running_distance(user_id, sensor).await?,
        (None, None) => {
            return Err(AppError::Validation(
                "distance_meters is required when no activity bridge is configured".into(),
            ))
        }
    };

    Ok(Json(ActivitySyncResponse {
        entry_exists: entry.is_some(),
        current_score,
    }))
}

pub async fn reset_today(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<TodayResponse>> {
    let user_id = auth_user.session_id().ok_or(AppError::InvalidSession)?;
    let entry = state.entries.reset(user_id).await?;
    Ok(Json(today_response(&state, user_id, entry).await))
}

pub async fn list_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<HistoryPoint>>> {
    let user_id = auth_user.session_id().ok_or(AppError::InvalidSession)?;
    let points = user_history(&state.store, user_id).await?;
    Ok(Json(points))
}
