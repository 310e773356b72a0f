use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid input data. Please check and try again.")]
    InvalidSession,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Failed to fetch data: {0}")]
    FetchFailed(String),

    #[error("Error saving entry: {0}")]
    SaveFailed(String),

    #[error("Activity data permission denied.")]
    SensorPermissionDenied,

    #[error("Activity sensor error: {0}")]
    SensorFailed(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidSession => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::FetchFailed(_) | AppError::SaveFailed(_) | AppError::SensorFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::SensorPermissionDenied => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg) | AppError::Validation(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            _ => self.to_string(),
        };

        let body = json!({
            "error": {
                "message": message,
                "code": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_failures_carry_cause() {
        let err = AppError::SaveFailed("connection reset".into());
        assert_eq!(err.to_string(), "Error saving entry: connection reset");
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let err = AppError::FetchFailed("timeout".into());
        assert_eq!(err.to_string(), "Failed to fetch data: timeout");
    }

    #[test]
    fn test_session_and_sensor_statuses() {
        assert_eq!(AppError::InvalidSession.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::SensorPermissionDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Validation("bad".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
