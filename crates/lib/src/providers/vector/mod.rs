pub mod qdrant;

use crate::errors::PipelineError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde_json::Value;
use std::fmt::Debug;

pub use qdrant::QdrantClient;

/// A trait for interacting with a vector search backend.
///
/// Request and response bodies stay opaque JSON: callers pass backend
/// parameters through verbatim and may hand the raw response back to their
/// own clients.
#[async_trait]
pub trait VectorStore: Send + Sync + DynClone + Debug {
    /// Runs a similarity query against the default collection.
    async fn query_points(&self, body: &Value) -> Result<Value, PipelineError>;

    /// Runs a filter-only scroll, optionally against a different collection.
    async fn scroll_points(
        &self,
        collection: Option<&str>,
        body: &Value,
    ) -> Result<Value, PipelineError>;
}

dyn_clone::clone_trait_object!(VectorStore);
