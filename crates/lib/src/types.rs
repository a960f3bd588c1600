use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The free-form context a candidate carries for extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum AdContext {
    /// A text/markup blob, usually the payload's `adContext` field.
    Text(String),
    /// A structured payload with no dedicated context string.
    Structured(Value),
}

impl AdContext {
    /// The context as it is handed to prompts and the fallback extractor.
    pub fn as_text(&self) -> String {
        match self {
            AdContext::Text(text) => text.clone(),
            AdContext::Structured(value) => value.to_string(),
        }
    }
}

/// One scored point returned by the vector search backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCandidate {
    pub id: Value,
    pub score: Option<f64>,
    /// `None` when the point has nothing usable to extract from.
    pub raw_context: Option<AdContext>,
    pub advertiser: Option<Value>,
    pub advertiser_logo_url: Option<String>,
    pub target_url: Option<String>,
    pub headlines: Vec<String>,
    pub preview_image_urls: Vec<String>,
    pub preview_text: Option<String>,
    /// The full point payload, `Value::Null` when the backend sent none.
    pub payload: Value,
}

impl RawCandidate {
    pub fn has_payload(&self) -> bool {
        !self.payload.is_null()
    }

    /// Builds a candidate from a backend point (`{ id, score, payload }`).
    pub fn from_point(point: &Value) -> Self {
        let payload = point.get("payload").cloned().unwrap_or(Value::Null);

        let raw_context = match payload.get("adContext") {
            Some(Value::String(text)) => Some(AdContext::Text(text.clone())),
            _ => match &payload {
                Value::Object(map) if !map.is_empty() => {
                    Some(AdContext::Structured(payload.clone()))
                }
                _ => None,
            },
        };

        Self {
            id: point.get("id").cloned().unwrap_or(Value::Null),
            score: point.get("score").and_then(Value::as_f64),
            raw_context,
            advertiser: payload
                .get("advertiser")
                .filter(|v| !v.is_null())
                .cloned(),
            advertiser_logo_url: string_field(&payload, "advertiser_logo_url"),
            target_url: string_field(&payload, "target_url"),
            headlines: string_list_field(&payload, "headlines"),
            preview_image_urls: string_list_field(&payload, "preview_image_urls"),
            preview_text: string_field(&payload, "preview_text"),
            payload,
        }
    }
}

fn string_field(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn string_list_field(payload: &Value, key: &str) -> Vec<String> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Optional per-candidate enrichments. Only the requested ones are populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_recommendations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_for_user: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engaging_headline: Option<String>,
    #[serde(default, rename = "audioAdScript", skip_serializing_if = "Option::is_none")]
    pub audio_script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_link: Option<String>,
}

/// The final enriched, validated unit returned to callers.
///
/// `headline` and `cta_url` are always non-blank and trimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCandidate {
    pub headline: String,
    pub cta_url: String,
    pub images: Vec<String>,
    pub summary: Option<String>,
    #[serde(flatten)]
    pub derived: DerivedContent,
    pub advertiser: Option<Value>,
    #[serde(rename = "advertiser_logo_url")]
    pub advertiser_logo_url: Option<String>,
}

impl AdCandidate {
    /// The deduplication key: lowercased headline and the CTA URL.
    pub fn dedup_key(&self) -> String {
        format!("{}|{}", self.headline.to_lowercase(), self.cta_url)
    }
}

/// A free-text query plus optional backend overrides.
///
/// Any field not named here is forwarded verbatim to the vector backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub input: String,
    /// Embedding model override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Whether to condense the input before embedding it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condense: Option<bool>,
    #[serde(flatten)]
    pub backend_params: Map<String, Value>,
}

impl QueryRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }
}

/// The outcome of an enrichment query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    pub ads: Vec<AdCandidate>,
    /// The text that was actually embedded.
    #[serde(rename = "condensedInput")]
    pub condensed_input: String,
    /// The untouched backend response object, flattened into the reply.
    #[serde(flatten)]
    pub backend: Map<String, Value>,
}

/// Copy for a single "talk to an expert" style button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonData {
    pub question: String,
    pub prompt: String,
}

/// A filter-only retrieval keyed by advertiser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertiserFilterRequest {
    #[serde(default)]
    pub advertiser_id: Option<Value>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default = "default_true_value")]
    pub with_payload: Value,
    #[serde(default)]
    pub with_vector: bool,
    #[serde(default)]
    pub additional_filter: Vec<Value>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default = "default_order_by")]
    pub order_by: Value,
}

fn default_true_value() -> Value {
    Value::Bool(true)
}

fn default_order_by() -> Value {
    serde_json::json!({ "key": "created", "direction": "desc" })
}
