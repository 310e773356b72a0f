use axum::{extract::State, Extension, Json};

use crate::auth::middleware::AuthUser;
use crate::db::EntryStore;
use crate::error::{AppError, AppResult};
use crate::models::user::UserProfile;
use crate::AppState;

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user_id = auth_user.session_id().ok_or(AppError::InvalidSession)?;

    let user = state
        .store
        .find_user(user_id)
        .await
        .map_err(|e| AppError::FetchFailed(e.to_string()))?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}
