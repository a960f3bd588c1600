//! # Ad Matching
//!
//! Given free-form user text, this crate finds the most semantically relevant
//! advertisements in a vector index, enriches each one with extracted fields
//! and generated content, and returns a validated, deduplicated list.
//!
//! The pipeline talks to three collaborators, each behind a trait:
//! a completion provider ([`providers::ai::AiProvider`]), an embedding provider
//! ([`providers::ai::EmbeddingProvider`]) and a vector store
//! ([`providers::vector::VectorStore`]).

pub mod aggregate;
pub mod constants;
pub mod errors;
pub mod extract;
pub mod generate;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod retrieve;
pub mod tasks;
pub mod types;

pub use errors::{ErrorKind, PipelineError};
pub use generate::Generator;
pub use pipeline::{AdPipeline, AdPipelineBuilder, QUERY_GENERATORS};
pub use tasks::{AdTask, ResolvedTask, TaskRegistry};
pub use types::{
    AdCandidate, AdContext, AdvertiserFilterRequest, ButtonData, DerivedContent, QueryOutcome,
    QueryRequest, RawCandidate,
};
