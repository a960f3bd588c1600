//! # Candidate Retriever
//!
//! Sends the query vector to the vector backend and maps the returned points
//! onto [`RawCandidate`]s. Ranking is entirely the backend's: the order of the
//! response is kept as-is.

use crate::{
    errors::PipelineError, providers::vector::VectorStore, types::RawCandidate,
};
use serde_json::{json, Map, Value};
use tracing::info;

/// The candidates of one query plus the backend's untouched response.
#[derive(Debug, Clone)]
pub struct Retrieval {
    pub candidates: Vec<RawCandidate>,
    pub raw: Value,
}

/// Builds the backend request body.
///
/// Caller parameters pass through verbatim, except the vector itself, a
/// default `with_payload: true`, and `limit` when the pipeline pins it.
pub fn build_query_body(
    vector: &[f32],
    params: &Map<String, Value>,
    limit_override: Option<u32>,
) -> Value {
    let mut body = params.clone();
    body.insert("query".to_string(), json!(vector));
    body.entry("with_payload").or_insert(Value::Bool(true));
    if let Some(limit) = limit_override {
        body.insert("limit".to_string(), json!(limit));
    }
    Value::Object(body)
}

/// Reads the ordered points out of a query response.
///
/// Accepts `result.points` (query API) and a bare `result` array (search API).
pub fn candidates_from_response(response: &Value) -> Result<Vec<RawCandidate>, PipelineError> {
    let result = response.get("result").ok_or_else(|| {
        PipelineError::MalformedVectorResponse("missing 'result' field".to_string())
    })?;

    let points = match result {
        Value::Array(points) => points,
        Value::Object(_) => result
            .get("points")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                PipelineError::MalformedVectorResponse("missing 'result.points' array".to_string())
            })?,
        _ => {
            return Err(PipelineError::MalformedVectorResponse(
                "'result' is neither an object nor an array".to_string(),
            ))
        }
    };

    Ok(points.iter().map(RawCandidate::from_point).collect())
}

/// Queries the backend and returns its candidates in ranked order.
pub async fn retrieve(
    store: &dyn VectorStore,
    vector: &[f32],
    params: &Map<String, Value>,
    limit_override: Option<u32>,
) -> Result<Retrieval, PipelineError> {
    let body = build_query_body(vector, params, limit_override);
    let raw = store.query_points(&body).await?;
    let candidates = candidates_from_response(&raw)?;
    info!("Retrieved {} candidates from vector store", candidates.len());
    Ok(Retrieval { candidates, raw })
}

/// Removes `adContext` from every point payload of a query response.
pub fn strip_ad_context(response: &mut Value) {
    let Some(points) = response
        .pointer_mut("/result/points")
        .and_then(Value::as_array_mut)
    else {
        return;
    };
    for point in points {
        if let Some(payload) = point.get_mut("payload").and_then(Value::as_object_mut) {
            payload.remove("adContext");
        }
    }
}
