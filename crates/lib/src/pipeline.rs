//! # Ad Pipeline
//!
//! The request-level flows: normalize the input, embed it, retrieve candidates
//! and enrich them. Only validation and upstream (embedding/retrieval) failures
//! abort a request; everything after retrieval degrades locally.

use crate::{
    aggregate::{aggregate, assemble_ad, derive_content},
    constants::{DEFAULT_ADVERTISER_LIMIT, DEFAULT_EMBEDDING_MODEL},
    errors::PipelineError,
    extract::ExtractedFields,
    generate::Generator,
    normalize::condense_query,
    providers::{ai::EmbeddingProvider, vector::VectorStore},
    retrieve::{build_query_body, candidates_from_response, retrieve, strip_ad_context, Retrieval},
    tasks::TaskRegistry,
    types::{AdvertiserFilterRequest, ButtonData, QueryOutcome, QueryRequest, RawCandidate},
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::info;

/// The generators run by a full `/query` style request.
pub const QUERY_GENERATORS: [Generator; 2] =
    [Generator::PromptRecommendations, Generator::QuestionsForUser];

/// Orchestrates the external collaborators for one ad-matching request.
#[derive(Clone, Debug)]
pub struct AdPipeline {
    tasks: Arc<TaskRegistry>,
    embedder: Box<dyn EmbeddingProvider>,
    vector_store: Box<dyn VectorStore>,
    embedding_model: String,
    condense_by_default: bool,
    advertiser_limit: u32,
}

/// A builder for creating `AdPipeline` instances.
#[derive(Default)]
pub struct AdPipelineBuilder {
    tasks: Option<TaskRegistry>,
    embedder: Option<Box<dyn EmbeddingProvider>>,
    vector_store: Option<Box<dyn VectorStore>>,
    embedding_model: Option<String>,
    condense_by_default: bool,
    advertiser_limit: Option<u32>,
}

impl AdPipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(mut self, tasks: TaskRegistry) -> Self {
        self.tasks = Some(tasks);
        self
    }

    pub fn embedder(mut self, embedder: Box<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn vector_store(mut self, vector_store: Box<dyn VectorStore>) -> Self {
        self.vector_store = Some(vector_store);
        self
    }

    /// Sets the embedding model used when a request names none.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = Some(model.into());
        self
    }

    /// Whether requests without an explicit `condense` flag are condensed.
    pub fn condense_by_default(mut self, condense: bool) -> Self {
        self.condense_by_default = condense;
        self
    }

    pub fn advertiser_limit(mut self, limit: u32) -> Self {
        self.advertiser_limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<AdPipeline, PipelineError> {
        Ok(AdPipeline {
            tasks: Arc::new(
                self.tasks
                    .ok_or(PipelineError::MissingCollaborator("task registry"))?,
            ),
            embedder: self
                .embedder
                .ok_or(PipelineError::MissingCollaborator("embedding provider"))?,
            vector_store: self
                .vector_store
                .ok_or(PipelineError::MissingCollaborator("vector store"))?,
            embedding_model: self
                .embedding_model
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            condense_by_default: self.condense_by_default,
            advertiser_limit: self.advertiser_limit.unwrap_or(DEFAULT_ADVERTISER_LIMIT),
        })
    }
}

fn validate_input(request: &QueryRequest) -> Result<(), PipelineError> {
    if request.input.trim().is_empty() {
        return Err(PipelineError::Validation(
            "Input text is required for embedding generation".to_string(),
        ));
    }
    Ok(())
}

fn into_backend_map(raw: Value) -> Map<String, Value> {
    match raw {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// JavaScript-style truthiness, used for loosely typed identifiers.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl AdPipeline {
    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    /// Normalizes, embeds and retrieves. Returns the embedded text alongside the
    /// retrieval.
    async fn search(
        &self,
        request: &QueryRequest,
        condense: bool,
        limit_override: Option<u32>,
    ) -> Result<(String, Retrieval), PipelineError> {
        validate_input(request)?;

        let search_text = if condense {
            condense_query(&self.tasks, &request.input).await
        } else {
            request.input.clone()
        };

        let model = request.model.as_deref().unwrap_or(&self.embedding_model);
        let vector = self.embedder.embed(&search_text, model).await?;
        let retrieval = retrieve(
            self.vector_store.as_ref(),
            &vector,
            &request.backend_params,
            limit_override,
        )
        .await?;

        Ok((search_text, retrieval))
    }

    fn condense_for(&self, request: &QueryRequest) -> bool {
        request.condense.unwrap_or(self.condense_by_default)
    }

    /// Full enrichment over every retrieved candidate.
    pub async fn query_ads(
        &self,
        request: &QueryRequest,
        generators: &[Generator],
    ) -> Result<QueryOutcome, PipelineError> {
        info!("Received ad query: '{}'", request.input);
        let (search_text, retrieval) = self
            .search(request, self.condense_for(request), None)
            .await?;

        let ads = aggregate(&self.tasks, &retrieval.candidates, generators, &search_text).await;
        Ok(QueryOutcome {
            ads,
            condensed_input: search_text,
            backend: into_backend_map(retrieval.raw),
        })
    }

    /// Single best candidate with extraction, prompt recommendations and
    /// questions for the user. `ads` holds zero or one element.
    pub async fn query_one(&self, request: &QueryRequest) -> Result<QueryOutcome, PipelineError> {
        info!("Received single ad query: '{}'", request.input);
        let (search_text, retrieval) = self
            .search(request, self.condense_for(request), Some(1))
            .await?;

        let best: Vec<RawCandidate> = best_candidate(&retrieval).into_iter().collect();
        let ads = aggregate(&self.tasks, &best, &QUERY_GENERATORS, &search_text).await;
        Ok(QueryOutcome {
            ads,
            condensed_input: search_text,
            backend: into_backend_map(retrieval.raw),
        })
    }

    /// Minimal HTML (one line of text and a link) for the best candidate.
    /// `None` when nothing matched.
    pub async fn simple_html(&self, request: &QueryRequest) -> Result<Option<String>, PipelineError> {
        let (search_text, retrieval) = self.search(request, true, Some(1)).await?;
        let Some(candidate) = best_candidate(&retrieval) else {
            return Ok(None);
        };
        let derived =
            derive_content(&self.tasks, &candidate, &[Generator::SimpleHtml], &search_text).await;
        Ok(Some(derived.html.unwrap_or_default()))
    }

    /// A clarifying question and follow-up prompt for the best candidate.
    /// `None` when nothing matched.
    pub async fn button(&self, request: &QueryRequest) -> Result<Option<ButtonData>, PipelineError> {
        let (search_text, retrieval) = self
            .search(request, self.condense_for(request), Some(1))
            .await?;
        let Some(candidate) = best_candidate(&retrieval) else {
            return Ok(None);
        };
        let derived =
            derive_content(&self.tasks, &candidate, &[Generator::ButtonData], &search_text).await;
        Ok(Some(ButtonData {
            question: derived.button_question.unwrap_or_default(),
            prompt: derived.button_link.unwrap_or_default(),
        }))
    }

    /// An audio-ready ad for the best candidate, built from its payload
    /// metadata plus a rewritten headline and a short script.
    pub async fn audio_ad(&self, request: &QueryRequest) -> Result<QueryOutcome, PipelineError> {
        let (search_text, retrieval) = self
            .search(request, self.condense_for(request), Some(1))
            .await?;

        let ad = match best_candidate(&retrieval) {
            Some(candidate) => {
                let derived = derive_content(
                    &self.tasks,
                    &candidate,
                    &[Generator::EngagingHeadline, Generator::AudioScript],
                    &search_text,
                )
                .await;
                let fields = ExtractedFields {
                    headline: derived.engaging_headline.clone(),
                    cta_url: candidate.target_url.clone(),
                    images: candidate.preview_image_urls.clone(),
                    summary: candidate.preview_text.clone(),
                };
                assemble_ad(&candidate, fields, derived)
            }
            None => None,
        };

        Ok(QueryOutcome {
            ads: ad.into_iter().collect(),
            condensed_input: search_text,
            backend: into_backend_map(retrieval.raw),
        })
    }

    /// Forwards a query body to the backend untouched.
    pub async fn raw_query(&self, body: &Value) -> Result<Value, PipelineError> {
        self.vector_store.query_points(body).await
    }

    /// Embeds and retrieves, returning the backend response with every
    /// payload's `adContext` removed.
    pub async fn api_query(&self, request: &QueryRequest) -> Result<Value, PipelineError> {
        validate_input(request)?;
        let model = request.model.as_deref().unwrap_or(&self.embedding_model);
        let vector = self.embedder.embed(&request.input, model).await?;
        let mut body = build_query_body(&vector, &request.backend_params, None);
        body["with_payload"] = Value::Bool(true);

        let mut response = self.vector_store.query_points(&body).await?;
        candidates_from_response(&response)?;
        strip_ad_context(&mut response);
        Ok(response)
    }

    /// Filter-only retrieval by advertiser. No embedding is computed.
    pub async fn advertiser_filter(
        &self,
        request: AdvertiserFilterRequest,
    ) -> Result<Value, PipelineError> {
        let advertiser_id = request
            .advertiser_id
            .filter(is_truthy)
            .ok_or_else(|| PipelineError::Validation("Missing advertiser_id".to_string()))?;

        let mut must = vec![json!({ "key": "advertiser_id", "match": { "value": advertiser_id } })];
        must.extend(request.additional_filter);

        let body = json!({
            "with_payload": request.with_payload,
            "filter": { "must": must },
            "limit": request.limit.unwrap_or(self.advertiser_limit),
            "with_vector": request.with_vector,
            "order_by": request.order_by,
        });

        info!(collection = ?request.collection_name, "Running advertiser filter scroll");
        self.vector_store
            .scroll_points(request.collection_name.as_deref(), &body)
            .await
    }
}

/// The top candidate, if the backend returned one with a payload.
fn best_candidate(retrieval: &Retrieval) -> Option<RawCandidate> {
    retrieval
        .candidates
        .first()
        .filter(|candidate| candidate.has_payload())
        .cloned()
}
