use thiserror::Error;

/// Custom error types for the ad-matching pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("Failed to send request to embeddings API: {0}")]
    EmbeddingRequest(reqwest::Error),
    #[error("Failed to deserialize embeddings API response: {0}")]
    EmbeddingDeserialization(reqwest::Error),
    #[error("Embeddings API returned an error: {0}")]
    EmbeddingApi(String),
    #[error("Embeddings API returned no vector")]
    MissingEmbedding,
    #[error("Failed to send request to vector store: {0}")]
    VectorRequest(reqwest::Error),
    #[error("Failed to deserialize vector store response: {0}")]
    VectorDeserialization(reqwest::Error),
    #[error("Vector store returned status {status}: {body}")]
    VectorApi { status: u16, body: String },
    #[error("Malformed vector store response: {0}")]
    MalformedVectorResponse(String),
    #[error("No task configured for '{0}'")]
    MissingTask(String),
    #[error("Pipeline is missing its {0}")]
    MissingCollaborator(&'static str),
}

/// Coarse classification of a [`PipelineError`], used by callers to decide how a
/// failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required input was missing. Nothing external was called.
    Validation,
    /// The embedding or retrieval collaborator failed. Fatal to the request.
    UpstreamFailure,
    /// Misconfiguration or a local bug.
    Internal,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Validation(_) => ErrorKind::Validation,
            PipelineError::AiRequest(_)
            | PipelineError::AiDeserialization(_)
            | PipelineError::AiApi(_)
            | PipelineError::EmbeddingRequest(_)
            | PipelineError::EmbeddingDeserialization(_)
            | PipelineError::EmbeddingApi(_)
            | PipelineError::MissingEmbedding
            | PipelineError::VectorRequest(_)
            | PipelineError::VectorDeserialization(_)
            | PipelineError::VectorApi { .. }
            | PipelineError::MalformedVectorResponse(_) => ErrorKind::UpstreamFailure,
            PipelineError::ReqwestClientBuild(_)
            | PipelineError::MissingTask(_)
            | PipelineError::MissingCollaborator(_) => ErrorKind::Internal,
        }
    }
}
