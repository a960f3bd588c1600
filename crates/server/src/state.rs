//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. Every secret and endpoint from the configuration
//! is handed to the pipeline's collaborators here; nothing downstream reads the
//! environment.

use crate::config::AppConfig;
use admatch::{
    providers::{
        ai::{openai::OpenAiProvider, AiProvider, HttpEmbeddingProvider},
        vector::QdrantClient,
    },
    AdPipeline, AdPipelineBuilder, AdTask, ResolvedTask, TaskRegistry,
};
use std::{collections::HashMap, sync::Arc};
use tracing::{info, warn};

const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The ad-matching pipeline with all of its collaborators.
    pub pipeline: Arc<AdPipeline>,
}

/// `${VAR}` substitution leaves unset secrets as empty strings.
fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

/// Instantiates an AI provider client for each entry in the `providers` map.
fn build_ai_providers(config: &AppConfig) -> anyhow::Result<HashMap<String, Box<dyn AiProvider>>> {
    let mut ai_providers = HashMap::new();
    for (name, provider_config) in &config.providers {
        let provider: Box<dyn AiProvider> = match provider_config.provider.as_str() {
            "openai" => {
                let api_url = provider_config
                    .api_url
                    .clone()
                    .filter(|url| !url.is_empty())
                    .unwrap_or_else(|| OPENAI_CHAT_COMPLETIONS_URL.to_string());
                let provider = OpenAiProvider::new(
                    api_url,
                    non_empty(&provider_config.api_key),
                    provider_config.model_name.clone(),
                )?;
                info!(provider = %name, model = %provider.model(), "Initialized AI provider.");
                Box::new(provider)
            }
            _ => {
                return Err(anyhow::anyhow!(
                    "Unsupported AI provider type '{}' for provider '{}'",
                    provider_config.provider,
                    name
                ));
            }
        };
        ai_providers.insert(name.clone(), provider);
    }
    Ok(ai_providers)
}

/// Resolves every configured task against its provider.
fn build_task_registry(
    config: &AppConfig,
    ai_providers: &HashMap<String, Box<dyn AiProvider>>,
) -> anyhow::Result<TaskRegistry> {
    let mut registry = TaskRegistry::new();
    for (name, task_config) in &config.tasks {
        let Some(task) = AdTask::from_name(name) else {
            warn!("Ignoring unknown task '{name}' in configuration");
            continue;
        };

        let provider_name = task_config.provider.as_deref().ok_or_else(|| {
            anyhow::anyhow!("Resolved task '{name}' is missing required 'provider' field")
        })?;
        let provider = ai_providers.get(provider_name).ok_or_else(|| {
            anyhow::anyhow!("Task '{name}' references unknown provider '{provider_name}'")
        })?;
        let system_prompt = task_config.system_prompt.clone().ok_or_else(|| {
            anyhow::anyhow!("Resolved task '{name}' is missing required 'system_prompt' field")
        })?;
        let user_prompt = task_config.user_prompt.clone().ok_or_else(|| {
            anyhow::anyhow!("Resolved task '{name}' is missing required 'user_prompt' field")
        })?;

        registry.insert(
            task,
            ResolvedTask {
                provider: provider.clone(),
                system_prompt,
                user_prompt,
            },
        );
    }

    for task in AdTask::ALL {
        registry.get(task)?;
    }
    Ok(registry)
}

/// Builds the shared application state from the configuration.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let ai_providers = build_ai_providers(&config)?;
    let tasks = build_task_registry(&config, &ai_providers)?;

    let embedder = HttpEmbeddingProvider::new(
        config.embedding.api_url.clone(),
        non_empty(&config.embedding.api_key),
    )?;
    let vector_store = QdrantClient::new(
        config.vector_store.url.clone(),
        non_empty(&config.vector_store.api_key),
        config.vector_store.collection.clone(),
    )?;
    info!(
        collection = %vector_store.collection(),
        embedding_model = %config.embedding.model_name,
        "Initialized vector store and embedding clients."
    );

    let pipeline = AdPipelineBuilder::new()
        .tasks(tasks)
        .embedder(Box::new(embedder))
        .vector_store(Box::new(vector_store))
        .embedding_model(config.embedding.model_name.clone())
        .condense_by_default(config.pipeline.condense_query)
        .advertiser_limit(config.pipeline.default_advertiser_limit)
        .build()?;

    Ok(AppState {
        pipeline: Arc::new(pipeline),
    })
}
