//! # Ad Enrichment Handlers
//!
//! Endpoints that run the full retrieval and enrichment pipeline, either over
//! every candidate or over the single best one.

use super::{AppError, AppState};
use crate::extract::ApiJson;
use crate::types::SimpleHtmlResponse;
use admatch::{ButtonData, QueryOutcome, QueryRequest, QUERY_GENERATORS};
use axum::{extract::State, Json};
use tracing::info;

const NO_MATCH: &str = "No matching ad found.";

/// Handler for `/query`: every candidate with prompt recommendations and
/// questions for the user.
pub async fn query_handler(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<QueryRequest>,
) -> Result<Json<QueryOutcome>, AppError> {
    let outcome = app_state
        .pipeline
        .query_ads(&payload, &QUERY_GENERATORS)
        .await?;
    info!("Returning {} ads for /query", outcome.ads.len());
    Ok(Json(outcome))
}

/// Handler for `/query-one`: the single best candidate, fully enriched.
pub async fn query_one_handler(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<QueryRequest>,
) -> Result<Json<QueryOutcome>, AppError> {
    let outcome = app_state.pipeline.query_one(&payload).await?;
    Ok(Json(outcome))
}

/// Handler for `/simple`: minimal HTML for the best candidate.
pub async fn simple_handler(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<QueryRequest>,
) -> Result<Json<SimpleHtmlResponse>, AppError> {
    let html = app_state
        .pipeline
        .simple_html(&payload)
        .await?
        .ok_or_else(|| AppError::NotFound(NO_MATCH.to_string()))?;
    Ok(Json(SimpleHtmlResponse { html }))
}

/// Handler for `/button`.
pub async fn button_handler(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<QueryRequest>,
) -> Result<Json<ButtonData>, AppError> {
    let button = app_state
        .pipeline
        .button(&payload)
        .await?
        .ok_or_else(|| AppError::NotFound(NO_MATCH.to_string()))?;
    Ok(Json(button))
}

/// Handler for `/audio`: the best candidate with a rewritten headline and a
/// short audio script.
pub async fn audio_handler(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<QueryRequest>,
) -> Result<Json<QueryOutcome>, AppError> {
    let outcome = app_state.pipeline.audio_ad(&payload).await?;
    Ok(Json(outcome))
}
