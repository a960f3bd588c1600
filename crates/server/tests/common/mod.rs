//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port with every external
//! collaborator (chat completions, embeddings, Qdrant) pointed at a single
//! `httpmock::MockServer`.

// Not every test file uses every helper.
#![allow(unused)]

use admatch_server::{config, router, state::build_app_state};
use anyhow::Result;
use axum::serve;
use httpmock::{Method, Mock, MockServer};
use reqwest::Client;
use serde_json::{json, Value};
use std::{fs::File, io::Write, net::SocketAddr};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const CHAT_PATH: &str = "/v1/chat/completions";
pub const EMBEDDINGS_PATH: &str = "/v1/embeddings";
pub const COLLECTION: &str = "test_ads";

// Substrings of the default system prompts, used to route chat mocks by task.
pub const CONDENSE_MARKER: &str = "search query optimization";
pub const EXTRACTION_MARKER: &str = "extracting marketing information";
pub const PROMPTS_MARKER: &str = "generate a list of 3 engaging, specific, and helpful prompt recommendations";
pub const QUESTIONS_MARKER: &str = "conversational marketing";
pub const HEADLINE_MARKER: &str = "You are an expert copywriter";
pub const AUDIO_MARKER: &str = "audio ad copywriter";
pub const HTML_MARKER: &str = "minimal HTML";
pub const BUTTON_MARKER: &str = "speak to a product expert";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server with the default test configuration.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_pipeline("condense_query: false").await
    }

    /// Spawns the server with a custom `pipeline:` section body.
    pub async fn spawn_with_pipeline(pipeline_yaml: &str) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();
        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
embedding:
  api_url: "{}"
  model_name: "mock-embedding-model"
  api_key: "emb-test-key"
vector_store:
  url: "{}"
  api_key: "qdrant-test-key"
  collection: "{COLLECTION}"
providers:
  openai_default:
    provider: "openai"
    api_url: "{}"
    api_key: null
    model_name: "mock-chat-model"
pipeline:
  {pipeline_yaml}
"#,
            mock_server.url(EMBEDDINGS_PATH),
            mock_server.base_url(),
            mock_server.url(CHAT_PATH),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}{path}", self.address))
            .json(body)
            .send()
            .await?)
    }

    /// Answers every embeddings request with a fixed vector.
    pub fn mock_embeddings(&self) -> Mock<'_> {
        self.mock_server.mock(|when, then| {
            when.method(Method::POST).path(EMBEDDINGS_PATH);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({ "data": [{ "embedding": [0.1, 0.2, 0.3, 0.4] }] }));
        })
    }

    /// Answers every Qdrant query with `points`, in order.
    pub fn mock_points(&self, points: Vec<Value>) -> Mock<'_> {
        self.mock_server.mock(|when, then| {
            when.method(Method::POST)
                .path(format!("/collections/{COLLECTION}/points/query"))
                .header("api-key", "qdrant-test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({ "result": { "points": points }, "status": "ok", "time": 0.001 }));
        })
    }

    /// Answers chat completions whose body contains `marker` with `content`.
    pub fn mock_chat(&self, marker: &str, content: &str) -> Mock<'_> {
        self.mock_server.mock(|when, then| {
            when.method(Method::POST).path(CHAT_PATH).body_contains(marker);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "choices": [{ "message": { "role": "assistant", "content": content } }]
                }));
        })
    }

    /// Fails chat completions whose body contains `marker`.
    pub fn mock_chat_failure(&self, marker: &str) -> Mock<'_> {
        self.mock_server.mock(|when, then| {
            when.method(Method::POST).path(CHAT_PATH).body_contains(marker);
            then.status(500).body("model overloaded");
        })
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

// --- Test Data ---

/// A backend point whose `adContext` has a headline section, one link and one
/// image.
pub fn ad_point(id: u64, headline: &str, url: &str) -> Value {
    json!({
        "id": id,
        "score": 0.87,
        "payload": {
            "adContext": format!(
                "[Headlines]\n{headline}\n\n[Page Content]\n<p>Everything about {headline}. Order today.</p><a href=\"{url}\">Go</a><img src=\"//cdn.example.com/{id}.png\">"
            ),
            "advertiser": format!("Advertiser {id}"),
            "advertiser_logo_url": format!("https://cdn.example.com/logo{id}.png"),
            "target_url": url,
            "headlines": [headline],
            "preview_image_urls": [format!("https://cdn.example.com/preview{id}.png")],
            "preview_text": format!("Preview of {headline}")
        }
    })
}
