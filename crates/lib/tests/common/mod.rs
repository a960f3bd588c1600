#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Scripted stand-ins for the three external collaborators so pipeline tests
//! run without network access and can assert on every call made.

use admatch::{
    providers::{
        ai::{AiProvider, CompletionRequest, EmbeddingProvider},
        vector::VectorStore,
    },
    AdPipeline, AdPipelineBuilder, AdTask, PipelineError, ResolvedTask, TaskRegistry,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::fmt;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber once per test binary.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("admatch=debug")
            .with_test_writer()
            .try_init();
    });
}

type Responder = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

// --- Mock AI Provider ---

/// A completion provider whose reply is computed from the rendered user prompt.
/// A `None` reply becomes an `AiApi` error.
#[derive(Clone)]
pub struct MockAiProvider {
    responder: Responder,
    delays: Arc<Vec<(String, Duration)>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl fmt::Debug for MockAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockAiProvider")
            .field("calls", &self.call_count())
            .finish()
    }
}

impl MockAiProvider {
    pub fn new(responder: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            responder: Arc::new(responder),
            delays: Arc::new(Vec::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answers with `text`.
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Some(text.clone()))
    }

    /// Always fails.
    pub fn failing() -> Self {
        Self::new(|_| None)
    }

    /// Delays the reply for prompts containing `marker`.
    pub fn with_delay(mut self, marker: &str, delay: Duration) -> Self {
        let mut delays = (*self.delays).clone();
        delays.push((marker.to_string(), delay));
        self.delays = Arc::new(delays);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, request: CompletionRequest<'_>) -> Result<String, PipelineError> {
        self.calls
            .lock()
            .unwrap()
            .push(request.user_prompt.to_string());

        let delay = self
            .delays
            .iter()
            .find(|(marker, _)| request.user_prompt.contains(marker.as_str()))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        (self.responder)(request.user_prompt)
            .ok_or_else(|| PipelineError::AiApi("mock provider failure".to_string()))
    }
}

/// A registry where every task listed gets its own mock and every other task
/// fails.
pub fn registry(providers: &[(AdTask, MockAiProvider)]) -> TaskRegistry {
    let mut tasks = TaskRegistry::with_default_prompts(Box::new(MockAiProvider::failing()));
    for (task, provider) in providers {
        tasks.insert(
            *task,
            ResolvedTask::with_default_prompts(*task, Box::new(provider.clone())),
        );
    }
    tasks
}

// --- Mock Embedding Provider ---

#[derive(Clone, Debug, Default)]
pub struct MockEmbedder {
    fail: bool,
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, input: &str, model: &str) -> Result<Vec<f32>, PipelineError> {
        self.calls
            .lock()
            .unwrap()
            .push((input.to_string(), model.to_string()));
        if self.fail {
            return Err(PipelineError::EmbeddingApi("status 503 Service Unavailable".to_string()));
        }
        Ok(vec![0.1, 0.2, 0.3])
    }
}

// --- Mock Vector Store ---

#[derive(Clone, Debug)]
pub struct MockVectorStore {
    response: Value,
    pub queries: Arc<Mutex<Vec<Value>>>,
    pub scrolls: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

impl MockVectorStore {
    /// Answers every query and scroll with `response`.
    pub fn new(response: Value) -> Self {
        Self {
            response,
            queries: Arc::new(Mutex::new(Vec::new())),
            scrolls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers with a query response holding `points` in order.
    pub fn with_points(points: Vec<Value>) -> Self {
        Self::new(json!({ "result": { "points": points }, "status": "ok", "time": 0.002 }))
    }

    pub fn last_query(&self) -> Option<Value> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn query_points(&self, body: &Value) -> Result<Value, PipelineError> {
        self.queries.lock().unwrap().push(body.clone());
        Ok(self.response.clone())
    }

    async fn scroll_points(
        &self,
        collection: Option<&str>,
        body: &Value,
    ) -> Result<Value, PipelineError> {
        self.scrolls
            .lock()
            .unwrap()
            .push((collection.map(String::from), body.clone()));
        Ok(self.response.clone())
    }
}

// --- Fixtures ---

/// A point whose `adContext` carries a headline section, one link and one image.
pub fn ad_point(id: u64, headline: &str, url: &str) -> Value {
    json!({
        "id": id,
        "score": 0.9,
        "payload": {
            "adContext": format!(
                "[Headlines]\n{headline}\n\n[Page Content]\n<p>All about {headline}. Great value.</p><a href=\"{url}\">Go</a><img src=\"https://img.example.com/{id}.png\">"
            ),
            "advertiser": format!("Advertiser {id}"),
            "advertiser_logo_url": format!("https://img.example.com/logo{id}.png"),
            "target_url": url,
            "headlines": [headline, format!("{headline} Alt")],
            "preview_image_urls": [format!("https://img.example.com/preview{id}.png")],
            "preview_text": format!("Preview for {headline}")
        }
    })
}

pub fn pipeline(tasks: TaskRegistry, embedder: MockEmbedder, store: MockVectorStore) -> AdPipeline {
    AdPipelineBuilder::new()
        .tasks(tasks)
        .embedder(Box::new(embedder))
        .vector_store(Box::new(store))
        .build()
        .expect("all collaborators are set")
}
