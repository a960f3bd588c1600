use serde::{Deserialize, Serialize};

/// The response body of the `/simple` endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct SimpleHtmlResponse {
    pub html: String,
}

/// The response body of the `/health` endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Unix time in milliseconds.
    pub timestamp: i64,
}
