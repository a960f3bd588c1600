//! The primary, AI-backed extractor.

use super::ExtractedFields;
use crate::{
    extract::fallback::is_allowed_url,
    tasks::{AdTask, TaskRegistry},
};
use serde_json::Value;
use tracing::warn;

/// Asks the extraction task for the four fields.
///
/// Never fails: transport errors, non-success statuses and unparseable output
/// all come back as [`ExtractedFields::default`].
pub async fn extract_with_ai(tasks: &TaskRegistry, context: &str) -> ExtractedFields {
    let response = match tasks
        .run(AdTask::AdExtraction, &[("context", context)])
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!("AI extraction failed, using fallback fields: {e}");
            return ExtractedFields::default();
        }
    };

    match parse_json_object(&response) {
        Some(value) => coerce_fields(&value),
        None => {
            warn!("AI extraction returned non-JSON output: {response}");
            ExtractedFields::default()
        }
    }
}

/// Parses a model response as a JSON object, tolerating a markdown code fence.
pub(crate) fn parse_json_object(response: &str) -> Option<Value> {
    let trimmed = response.trim();
    let cleaned = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.strip_suffix("```").unwrap_or(rest))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str::<Value>(cleaned)
        .ok()
        .filter(Value::is_object)
}

/// Maps a parsed object onto the fields. A field of the wrong type becomes
/// null/empty instead of rejecting the whole object.
pub(crate) fn coerce_fields(value: &Value) -> ExtractedFields {
    let text = |key: &str| value.get(key).and_then(Value::as_str).map(String::from);

    let images = value
        .get("images")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|src| is_allowed_url(src))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    ExtractedFields {
        headline: text("headline"),
        cta_url: text("ctaUrl"),
        images,
        summary: text("summary"),
    }
}
