//! # Embeddings Provider
//!
//! This module turns query text into a vector by calling an external,
//! OpenAI-compatible embeddings API. There is no fallback vector: any failure
//! here is fatal to the request that asked for it.

use crate::errors::PipelineError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{debug, error};

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize, Debug)]
struct OpenAIEmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize, Debug)]
struct OpenAIEmbeddingResponse {
    #[serde(default)]
    data: Vec<OpenAIEmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct OpenAIEmbeddingData {
    #[serde(default)]
    embedding: Option<Vec<f32>>,
}

/// Generates a vector embedding for a given text input using an external API.
pub async fn generate_embedding(
    client: &ReqwestClient,
    api_url: &str,
    model: &str,
    input: &str,
    api_key: Option<&str>,
) -> Result<Vec<f32>, PipelineError> {
    let request_body = OpenAIEmbeddingRequest { model, input };
    debug!(payload = ?request_body, "--> Sending request to embeddings API");

    let mut request_builder = client.post(api_url).json(&request_body);
    if let Some(key) = api_key {
        request_builder = request_builder.bearer_auth(key);
    }

    let response = request_builder
        .send()
        .await
        .map_err(PipelineError::EmbeddingRequest)?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        error!(%status, body = %error_text, "Embeddings API returned an error");
        return Err(PipelineError::EmbeddingApi(format!("status {status}")));
    }

    let openai_response: OpenAIEmbeddingResponse = response
        .json()
        .await
        .map_err(PipelineError::EmbeddingDeserialization)?;

    openai_response
        .data
        .into_iter()
        .next()
        .and_then(|d| d.embedding)
        .filter(|v| !v.is_empty())
        .ok_or(PipelineError::MissingEmbedding)
}

/// Turns normalized query text into a fixed-length vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug + DynClone {
    /// Embeds `input` with the given model identifier.
    async fn embed(&self, input: &str, model: &str) -> Result<Vec<f32>, PipelineError>;
}

dyn_clone::clone_trait_object!(EmbeddingProvider);

/// An [`EmbeddingProvider`] backed by an HTTP embeddings endpoint.
#[derive(Clone, Debug)]
pub struct HttpEmbeddingProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl HttpEmbeddingProvider {
    pub fn new(api_url: String, api_key: Option<String>) -> Result<Self, PipelineError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PipelineError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, input: &str, model: &str) -> Result<Vec<f32>, PipelineError> {
        generate_embedding(
            &self.client,
            &self.api_url,
            model,
            input,
            self.api_key.as_deref(),
        )
        .await
    }
}
