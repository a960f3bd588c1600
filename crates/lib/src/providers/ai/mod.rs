pub mod embedding;
pub mod openai;

use crate::errors::PipelineError;
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use embedding::{generate_embedding, EmbeddingProvider, HttpEmbeddingProvider};
use serde::Serialize;
use std::fmt::Debug;

/// The output shape requested from a completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

/// A single completion call: instructions, content and output bounds.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

/// A trait for interacting with an AI provider.
///
/// Every enrichment step (query condensing, field extraction, derived content)
/// goes through this interface, so tests can swap in a scripted provider.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Runs one completion and returns the raw message content.
    async fn generate(&self, request: CompletionRequest<'_>) -> Result<String, PipelineError>;
}

dyn_clone::clone_trait_object!(AiProvider);
