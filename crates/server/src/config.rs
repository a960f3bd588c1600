//! # Application Configuration
//!
//! This module defines the configuration structure for the `admatch-server` and
//! provides the logic for loading it from a `config.yml` file and environment
//! variables.

use admatch::{
    constants::{DEFAULT_ADVERTISER_LIMIT, DEFAULT_COLLECTION, DEFAULT_EMBEDDING_MODEL},
    AdTask,
};
use config::{
    Config as ConfigBuilder, Environment, File, FileFormat, Value as ConfigValue,
    ValueKind as ConfigValueKind,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use tracing::info;

/// The provider every default task is bound to.
pub const DEFAULT_PROVIDER_NAME: &str = "openai_default";

static ENV_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").expect("placeholder pattern is valid")
});

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Configuration for the text embedding model.
    pub embedding: EmbeddingConfig,
    /// Configuration for the vector search backend.
    pub vector_store: VectorStoreConfig,
    /// A map of named, reusable AI provider configurations.
    pub providers: HashMap<String, ProviderConfig>,
    /// A map of tasks, each specifying a provider and prompts.
    pub tasks: HashMap<String, TaskConfig>,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

fn default_port() -> u16 {
    9090
}

/// Configuration for the embedding model provider.
#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    pub api_url: String,
    #[serde(default = "default_embedding_model")]
    pub model_name: String,
    pub api_key: Option<String>,
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

/// Configuration for the Qdrant vector store.
#[derive(Debug, Deserialize, Clone)]
pub struct VectorStoreConfig {
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

/// A reusable configuration for a specific AI provider instance.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// The type of provider. Only "openai" (any compatible endpoint) is supported.
    pub provider: String,
    /// The chat completions URL. Defaults to the public OpenAI endpoint.
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub model_name: String,
}

/// Defines the prompts and provider for a specific application task.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TaskConfig {
    /// The key of the provider to use from the `providers` map.
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub user_prompt: Option<String>,
}

/// Request-level pipeline switches.
#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Condense user input before embedding when a request does not say.
    #[serde(default)]
    pub condense_query: bool,
    #[serde(default = "default_advertiser_limit")]
    pub default_advertiser_limit: u32,
}

fn default_advertiser_limit() -> u32 {
    DEFAULT_ADVERTISER_LIMIT
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            condense_query: false,
            default_advertiser_limit: DEFAULT_ADVERTISER_LIMIT,
        }
    }
}

/// Constructs a `config::Value` map of the default tasks from the library.
/// This serves as the base layer of configuration.
fn build_default_tasks() -> HashMap<String, ConfigValue> {
    AdTask::ALL
        .into_iter()
        .map(|task| {
            let mut table = HashMap::new();
            table.insert(
                "provider".to_string(),
                ConfigValue::from(DEFAULT_PROVIDER_NAME),
            );
            table.insert(
                "system_prompt".to_string(),
                ConfigValue::from(task.default_system_prompt()),
            );
            table.insert(
                "user_prompt".to_string(),
                ConfigValue::from(task.default_user_prompt()),
            );
            (
                task.name().to_string(),
                ConfigValue::new(None, ConfigValueKind::Table(table)),
            )
        })
        .collect()
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let expanded_content = ENV_PLACEHOLDER.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - Top-level keys like `port` are overridden by `PORT`.
/// - Nested keys are overridden by `ADMATCH_...` variables
///   (e.g., `ADMATCH_VECTOR_STORE__COLLECTION`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults from the library.
        .set_default("tasks", build_default_tasks())?;

    // Layer 2: Main config file.
    let main_config_path = match config_path_override {
        Some(override_path) => override_path.to_string(),
        None => format!("{base_path}/config.yml"),
    };
    info!("Loading configuration from '{main_config_path}'.");

    let main_content = read_and_substitute(&main_config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Main config file not found at '{main_config_path}'."
        ))
    })?;
    builder = builder.add_source(File::from_str(&main_content, FileFormat::Yaml));

    // Layer 3: User prompt overrides (optional).
    let user_prompt_path = format!("{base_path}/prompt.yml");
    if let Some(user_prompts_content) = read_and_substitute(&user_prompt_path)? {
        info!("Loading user prompt overrides from '{user_prompt_path}'.");
        builder = builder.add_source(File::from_str(&user_prompts_content, FileFormat::Yaml));
    }

    let settings = builder
        // Layer 4: Plain environment variables for top-level keys like PORT.
        .add_source(Environment::default().try_parsing(true))
        // Layer 5: Prefixed environment variables for nested overrides.
        .add_source(
            Environment::with_prefix("ADMATCH")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
