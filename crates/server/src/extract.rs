//! # Request Extractors

use crate::errors::AppError;
use admatch::PipelineError;
use axum::extract::{rejection::JsonRejection, FromRequest};

/// `axum::Json` whose rejections (malformed body, wrong content type, wrong
/// field types) are reported as validation errors in the usual error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Pipeline(PipelineError::Validation(rejection.body_text()))
    }
}
