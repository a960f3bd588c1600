//! # Completion Tasks
//!
//! Every external completion call made by the pipeline is a named task with its
//! own prompts and fixed generation bounds. The [`TaskRegistry`] binds each task
//! to a provider and the (possibly overridden) prompt templates.

use crate::{
    errors::PipelineError,
    prompts::tasks::*,
    providers::ai::{AiProvider, CompletionRequest, ResponseFormat},
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use tracing::debug;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

/// The completion tasks known to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdTask {
    QueryCondense,
    AdExtraction,
    PromptRecommendations,
    QuestionsForUser,
    EngagingHeadline,
    AudioScript,
    SimpleHtml,
    ButtonData,
}

impl AdTask {
    pub const ALL: [AdTask; 8] = [
        AdTask::QueryCondense,
        AdTask::AdExtraction,
        AdTask::PromptRecommendations,
        AdTask::QuestionsForUser,
        AdTask::EngagingHeadline,
        AdTask::AudioScript,
        AdTask::SimpleHtml,
        AdTask::ButtonData,
    ];

    /// The configuration key of the task.
    pub fn name(&self) -> &'static str {
        match self {
            AdTask::QueryCondense => "query_condense",
            AdTask::AdExtraction => "ad_extraction",
            AdTask::PromptRecommendations => "prompt_recommendations",
            AdTask::QuestionsForUser => "questions_for_user",
            AdTask::EngagingHeadline => "engaging_headline",
            AdTask::AudioScript => "audio_script",
            AdTask::SimpleHtml => "simple_html",
            AdTask::ButtonData => "button_data",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|task| task.name() == name)
    }

    pub fn default_system_prompt(&self) -> &'static str {
        match self {
            AdTask::QueryCondense => QUERY_CONDENSE_SYSTEM_PROMPT,
            AdTask::AdExtraction => AD_EXTRACTION_SYSTEM_PROMPT,
            AdTask::PromptRecommendations => PROMPT_RECOMMENDATIONS_SYSTEM_PROMPT,
            AdTask::QuestionsForUser => QUESTIONS_FOR_USER_SYSTEM_PROMPT,
            AdTask::EngagingHeadline => ENGAGING_HEADLINE_SYSTEM_PROMPT,
            AdTask::AudioScript => AUDIO_SCRIPT_SYSTEM_PROMPT,
            AdTask::SimpleHtml => SIMPLE_HTML_SYSTEM_PROMPT,
            AdTask::ButtonData => BUTTON_DATA_SYSTEM_PROMPT,
        }
    }

    pub fn default_user_prompt(&self) -> &'static str {
        match self {
            AdTask::QueryCondense => QUERY_CONDENSE_USER_PROMPT,
            AdTask::AdExtraction => AD_EXTRACTION_USER_PROMPT,
            AdTask::PromptRecommendations => PROMPT_RECOMMENDATIONS_USER_PROMPT,
            AdTask::QuestionsForUser => QUESTIONS_FOR_USER_USER_PROMPT,
            AdTask::EngagingHeadline => ENGAGING_HEADLINE_USER_PROMPT,
            AdTask::AudioScript => AUDIO_SCRIPT_USER_PROMPT,
            AdTask::SimpleHtml => SIMPLE_HTML_USER_PROMPT,
            AdTask::ButtonData => BUTTON_DATA_USER_PROMPT,
        }
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            AdTask::QueryCondense => 32,
            AdTask::AdExtraction => 1000,
            AdTask::PromptRecommendations | AdTask::QuestionsForUser => 500,
            AdTask::EngagingHeadline => 100,
            AdTask::AudioScript | AdTask::SimpleHtml | AdTask::ButtonData => 300,
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            AdTask::EngagingHeadline => 0.2,
            AdTask::AudioScript => 0.7,
            _ => 0.0,
        }
    }

    pub fn response_format(&self) -> ResponseFormat {
        match self {
            AdTask::AdExtraction
            | AdTask::PromptRecommendations
            | AdTask::QuestionsForUser
            | AdTask::ButtonData => ResponseFormat::JsonObject,
            AdTask::QueryCondense
            | AdTask::EngagingHeadline
            | AdTask::AudioScript
            | AdTask::SimpleHtml => ResponseFormat::Text,
        }
    }
}

/// A task bound to a provider and concrete prompt templates.
#[derive(Clone, Debug)]
pub struct ResolvedTask {
    pub provider: Box<dyn AiProvider>,
    pub system_prompt: String,
    pub user_prompt: String,
}

impl ResolvedTask {
    /// Binds `task` to `provider` using the built-in prompts.
    pub fn with_default_prompts(task: AdTask, provider: Box<dyn AiProvider>) -> Self {
        Self {
            provider,
            system_prompt: task.default_system_prompt().to_string(),
            user_prompt: task.default_user_prompt().to_string(),
        }
    }
}

/// The set of tasks available to a pipeline.
#[derive(Clone, Debug, Default)]
pub struct TaskRegistry {
    tasks: HashMap<AdTask, ResolvedTask>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every task against a single provider with the default prompts.
    pub fn with_default_prompts(provider: Box<dyn AiProvider>) -> Self {
        let tasks = AdTask::ALL
            .into_iter()
            .map(|task| {
                (
                    task,
                    ResolvedTask::with_default_prompts(task, provider.clone()),
                )
            })
            .collect();
        Self { tasks }
    }

    pub fn insert(&mut self, task: AdTask, resolved: ResolvedTask) {
        self.tasks.insert(task, resolved);
    }

    pub fn get(&self, task: AdTask) -> Result<&ResolvedTask, PipelineError> {
        self.tasks
            .get(&task)
            .ok_or_else(|| PipelineError::MissingTask(task.name().to_string()))
    }

    /// Renders the task's user prompt with `vars` and runs one completion.
    pub async fn run(&self, task: AdTask, vars: &[(&str, &str)]) -> Result<String, PipelineError> {
        let resolved = self.get(task)?;
        let user_prompt = render_template(&resolved.user_prompt, vars);

        debug!(task = task.name(), user_prompt = %user_prompt, "--> Sending task prompt to AI provider");
        let response = resolved
            .provider
            .generate(CompletionRequest {
                system_prompt: &resolved.system_prompt,
                user_prompt: &user_prompt,
                max_tokens: task.max_tokens(),
                temperature: task.temperature(),
                response_format: task.response_format(),
            })
            .await?;
        debug!(task = task.name(), "<-- Task response: {}", response);

        Ok(response)
    }
}

/// Substitutes `{name}` placeholders in a prompt template in a single pass.
///
/// Substituted values are never rescanned. Placeholders without a matching
/// variable are left as they are.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            vars.iter()
                .find(|(name, _)| *name == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        })
        .into_owned()
}
