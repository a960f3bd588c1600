//! # General Route Handlers
//!
//! The root and health check endpoints.

use crate::types::HealthResponse;
use axum::Json;
use chrono::Utc;

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "admatch server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().timestamp_millis(),
    })
}
