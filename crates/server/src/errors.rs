use admatch::{ErrorKind, PipelineError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// Each variant maps onto one HTTP status. Upstream detail is logged and never
/// echoed to the client.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from the `admatch` pipeline.
    Pipeline(PipelineError),
    /// The request was valid but nothing matched.
    NotFound(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::Pipeline(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, kind, error_message) = match self {
            AppError::Pipeline(err) => match err.kind() {
                ErrorKind::Validation => {
                    warn!("Rejected request: {err}");
                    (StatusCode::BAD_REQUEST, "validation", err.to_string())
                }
                ErrorKind::UpstreamFailure => {
                    error!("Upstream failure: {err:?}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "upstream_failure",
                        "An upstream service failed to respond correctly.".to_string(),
                    )
                }
                ErrorKind::Internal => {
                    error!("Pipeline error: {err:?}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal",
                        "Server is not configured correctly.".to_string(),
                    )
                }
            },
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "kind": kind,
            "status": status_code.as_u16(),
        }));

        (status_code, body).into_response()
    }
}
