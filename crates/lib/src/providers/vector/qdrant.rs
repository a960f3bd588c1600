use super::VectorStore;
use crate::errors::PipelineError;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use tracing::{debug, error};

/// A client for the Qdrant points HTTP API.
#[derive(Clone, Debug)]
pub struct QdrantClient {
    client: ReqwestClient,
    base_url: String,
    api_key: Option<String>,
    collection: String,
}

impl QdrantClient {
    /// Creates a new `QdrantClient` bound to a default collection.
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        collection: String,
    ) -> Result<Self, PipelineError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PipelineError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            collection,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn points_url(&self, collection: &str, operation: &str) -> String {
        format!(
            "{}/collections/{collection}/points/{operation}",
            self.base_url
        )
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value, PipelineError> {
        debug!(%url, "--> Sending request to vector store");
        let mut request_builder = self.client.post(url).json(body);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.header("api-key", key);
        }

        let response = request_builder
            .send()
            .await
            .map_err(PipelineError::VectorRequest)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, body = %error_text, "Vector store returned an error");
            return Err(PipelineError::VectorApi {
                status: status.as_u16(),
                body: error_text,
            });
        }

        response
            .json()
            .await
            .map_err(PipelineError::VectorDeserialization)
    }
}

#[async_trait]
impl VectorStore for QdrantClient {
    async fn query_points(&self, body: &Value) -> Result<Value, PipelineError> {
        let url = self.points_url(&self.collection, "query");
        self.post(&url, body).await
    }

    async fn scroll_points(
        &self,
        collection: Option<&str>,
        body: &Value,
    ) -> Result<Value, PipelineError> {
        let url = self.points_url(collection.unwrap_or(&self.collection), "scroll");
        self.post(&url, body).await
    }
}
