//! # Backend Passthrough Handlers
//!
//! Endpoints that return the vector backend's JSON with little or no
//! processing.

use super::{AppError, AppState};
use crate::extract::ApiJson;
use admatch::{AdvertiserFilterRequest, QueryRequest};
use axum::{extract::State, Json};
use serde_json::Value;
use tracing::info;

/// Handler for `/raw`: forwards the body verbatim to the backend query API.
pub async fn raw_query_handler(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<Value>, AppError> {
    let response = app_state.pipeline.raw_query(&payload).await?;
    Ok(Json(response))
}

/// Handler for `/api/query`: embeds `input` and returns the backend response
/// without the `adContext` payload field.
pub async fn api_query_handler(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<QueryRequest>,
) -> Result<Json<Value>, AppError> {
    let response = app_state.pipeline.api_query(&payload).await?;
    Ok(Json(response))
}

/// Handler for `/advertiser-filter`: a filter-only scroll keyed by advertiser.
pub async fn advertiser_filter_handler(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<AdvertiserFilterRequest>,
) -> Result<Json<Value>, AppError> {
    info!(advertiser_id = ?payload.advertiser_id, "Received advertiser filter request");
    let response = app_state.pipeline.advertiser_filter(payload).await?;
    Ok(Json(response))
}
