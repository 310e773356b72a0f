//! Activity-sensor collaborator: walking/running distance for a time window.
//!
//! Two sources exist. Devices that read their own sensor push the cumulative
//! meters with the request (`ReportedDistance`); otherwise the service asks an
//! activity bridge over HTTP (`HttpActivitySensor`).

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceKind {
    WalkingRunning,
}

impl DistanceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WalkingRunning => "walking_running",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("activity bridge request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid distance reading: {0}")]
    InvalidReading(f64),
}

pub trait ActivitySensor: Send + Sync {
    fn request_authorization(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<bool, SensorError>> + Send;

    /// Cumulative distance in meters over `[start, end)`.
    fn cumulative_distance(
        &self,
        user_id: &str,
        kind: DistanceKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = Result<f64, SensorError>> + Send;
}

/// Meters the device already read from its own sensor and sent along.
#[derive(Debug, Clone, Copy)]
pub struct ReportedDistance {
    pub meters: f64,
}

impl ActivitySensor for ReportedDistance {
    async fn request_authorization(&self, _user_id: &str) -> Result<bool, SensorError> {
        // The device only reports after its own permission prompt succeeded.
        Ok(true)
    }

    async fn cumulative_distance(
        &self,
        _user_id: &str,
        _kind: DistanceKind,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<f64, SensorError> {
        Ok(self.meters)
    }
}

#[derive(Debug, Deserialize)]
struct AuthorizationResponse {
    authorized: bool,
}

#[derive(Debug, Deserialize)]
struct DistanceResponse {
    meters: f64,
}

#[derive(Debug, Clone)]
pub struct HttpActivitySensor {
    client: reqwest::Client,
    base_url: String,
}

impl HttpActivitySensor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl ActivitySensor for HttpActivitySensor {
    async fn request_authorization(&self, user_id: &str) -> Result<bool, SensorError> {
        let resp: AuthorizationResponse = self
            .client
            .get(format!("{}/authorization", self.base_url))
            .query(&[("user_id", user_id)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp.authorized)
    }

    async fn cumulative_distance(
        &self,
        user_id: &str,
        kind: DistanceKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<f64, SensorError> {
        let start = start.to_rfc3339();
        let end = end.to_rfc3339();
        let resp: DistanceResponse = self
            .client
            .get(format!("{}/distance", self.base_url))
            .query(&[
                ("user_id", user_id),
                ("kind", kind.as_str()),
                ("start", start.as_str()),
                ("end", end.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !resp.meters.is_finite() || resp.meters < 0.0 {
            return Err(SensorError::InvalidReading(resp.meters));
        }

        tracing::debug!(user_id = %user_id, meters = resp.meters, "Activity distance read");
        Ok(resp.meters)
    }
}

/// Serves a stand-in activity bridge on an ephemeral port and returns its
/// base URL.
#[cfg(test)]
pub(crate) async fn spawn_bridge(authorized: bool, meters: f64) -> String {
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    let app = Router::new()
        .route(
            "/authorization",
            get(move || async move { Json(json!({ "authorized": authorized })) }),
        )
        .route(
            "/distance",
            get(move |Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("kind").map(String::as_str), Some("walking_running"));
                assert!(q.contains_key("start") && q.contains_key("end"));
                Json::<Value>(json!({ "meters": meters }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2024, 4, 22, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 22, 18, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_reported_distance_is_authorized() {
        let sensor = ReportedDistance { meters: 4200.0 };
        let (start, end) = window();
        assert!(sensor.request_authorization("u1").await.unwrap());
        let meters = sensor
            .cumulative_distance("u1", DistanceKind::WalkingRunning, start, end)
            .await
            .unwrap();
        assert_eq!(meters, 4200.0);
    }

    #[tokio::test]
    async fn test_http_sensor_reads_bridge() {
        let base = spawn_bridge(true, 3000.0).await;
        let sensor = HttpActivitySensor::new(base);
        let (start, end) = window();

        assert!(sensor.request_authorization("u1").await.unwrap());
        let meters = sensor
            .cumulative_distance("u1", DistanceKind::WalkingRunning, start, end)
            .await
            .unwrap();
        assert_eq!(meters, 3000.0);
    }

    #[tokio::test]
    async fn test_http_sensor_reports_denial() {
        let base = spawn_bridge(false, 0.0).await;
        let sensor = HttpActivitySensor::new(base);
        assert!(!sensor.request_authorization("u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_http_sensor_rejects_negative_reading() {
        let base = spawn_bridge(true, -5.0).await;
        let sensor = HttpActivitySensor::new(base);
        let (start, end) = window();
        let err = sensor
            .cumulative_distance("u1", DistanceKind::WalkingRunning, start, end)
            .await
            .unwrap_err();
        assert!(matches!(err, SensorError::InvalidReading(_)));
    }
}
