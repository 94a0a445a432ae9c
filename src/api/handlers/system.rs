//! System endpoints: liveness and readiness.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: String,
    /// Server time, RFC 3339.
    pub timestamp: String,
    /// Crate version.
    pub version: String,
}

/// Readiness response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    /// Always `"ready"`.
    pub status: String,
    /// Storage reachability.
    pub storage: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /health/ready` — Storage round-trip.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] (503) if the store does not answer.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "System",
    summary = "Readiness check",
    description = "Pings the storage backend. Fails with 503 when it is unreachable.",
    responses(
        (status = 200, description = "Storage reachable", body = ReadinessResponse),
        (status = 503, description = "Storage unreachable", body = ErrorResponse),
    )
)]
pub async fn ready_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.booking_service.store().ping().await?;
    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
        storage: "ok".to_string(),
    }))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/ready", get(ready_handler))
}
