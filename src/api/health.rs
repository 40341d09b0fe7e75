//! Liveness and readiness endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;

use crate::api::types::{HealthResponse, HealthStatus, Json, RootResponse};

use super::state::AppState;

/// GET /
///
/// Answers as long as the process is up, whatever the models are doing.
pub async fn root() -> impl IntoResponse {
    let response = RootResponse {
        message: "AgriSense ML Service is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    };

    (StatusCode::OK, Json(response))
}

/// GET /health
///
/// Degraded still returns 200 so partially loaded instances keep taking traffic.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.registry.status().await;
    let response = HealthResponse::from(&status);

    let status_code = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}
