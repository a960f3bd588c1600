//! # Derived-Content Generators
//!
//! Each generator is one completion task over a candidate's data. They are
//! independent of each other and never fail: an external error, or output of the
//! wrong shape, yields an empty result for that generator only.

use crate::{
    extract::ai::parse_json_object,
    tasks::{AdTask, TaskRegistry},
    types::{ButtonData, DerivedContent, RawCandidate},
};
use serde_json::Value;
use tracing::warn;

/// The most items kept from a list-shaped generator.
pub const MAX_LIST_ITEMS: usize = 3;

/// A derived-content step that can be requested for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    PromptRecommendations,
    QuestionsForUser,
    EngagingHeadline,
    AudioScript,
    SimpleHtml,
    ButtonData,
}

/// The output of one generator.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    PromptRecommendations(Vec<String>),
    QuestionsForUser(Vec<String>),
    EngagingHeadline(String),
    AudioScript(String),
    SimpleHtml(String),
    ButtonData(ButtonData),
}

impl Generator {
    pub fn task(&self) -> AdTask {
        match self {
            Generator::PromptRecommendations => AdTask::PromptRecommendations,
            Generator::QuestionsForUser => AdTask::QuestionsForUser,
            Generator::EngagingHeadline => AdTask::EngagingHeadline,
            Generator::AudioScript => AdTask::AudioScript,
            Generator::SimpleHtml => AdTask::SimpleHtml,
            Generator::ButtonData => AdTask::ButtonData,
        }
    }

    /// Runs the generator for one candidate.
    pub async fn run(
        &self,
        tasks: &TaskRegistry,
        candidate: &RawCandidate,
        user_input: &str,
    ) -> Generated {
        match self {
            Generator::PromptRecommendations => Generated::PromptRecommendations(
                generate_list(tasks, self.task(), &ad_context_text(candidate), "prompts").await,
            ),
            Generator::QuestionsForUser => Generated::QuestionsForUser(
                generate_list(tasks, self.task(), &ad_context_text(candidate), "questions").await,
            ),
            Generator::EngagingHeadline => Generated::EngagingHeadline(
                engaging_headline(tasks, &candidate.headlines, user_input).await,
            ),
            Generator::AudioScript => {
                let payload = serde_json::to_string_pretty(&candidate.payload)
                    .unwrap_or_else(|_| candidate.payload.to_string());
                let vars = [("context", payload.as_str()), ("input", user_input)];
                Generated::AudioScript(generate_text(tasks, self.task(), &vars).await)
            }
            Generator::SimpleHtml => {
                let payload = candidate.payload.to_string();
                Generated::SimpleHtml(
                    generate_text(tasks, self.task(), &[("context", payload.as_str())]).await,
                )
            }
            Generator::ButtonData => {
                Generated::ButtonData(button_data(tasks, &candidate.payload).await)
            }
        }
    }
}

impl Generated {
    /// Stores this output on the candidate's derived content.
    pub fn apply_to(self, derived: &mut DerivedContent) {
        match self {
            Generated::PromptRecommendations(prompts) => {
                derived.prompt_recommendations = Some(prompts)
            }
            Generated::QuestionsForUser(questions) => derived.questions_for_user = Some(questions),
            Generated::EngagingHeadline(headline) => {
                derived.engaging_headline = Some(headline).filter(|h| !h.is_empty())
            }
            Generated::AudioScript(script) => derived.audio_script = Some(script),
            Generated::SimpleHtml(html) => derived.html = Some(html),
            Generated::ButtonData(button) => {
                derived.button_question = Some(button.question);
                derived.button_link = Some(button.prompt);
            }
        }
    }
}

fn ad_context_text(candidate: &RawCandidate) -> String {
    candidate
        .raw_context
        .as_ref()
        .map(|context| context.as_text())
        .unwrap_or_else(|| candidate.payload.to_string())
}

/// Plain-text task output, trimmed. Empty on failure.
async fn generate_text(tasks: &TaskRegistry, task: AdTask, vars: &[(&str, &str)]) -> String {
    match tasks.run(task, vars).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!(task = task.name(), "Generator failed: {e}");
            String::new()
        }
    }
}

/// A `{ "<key>": [..] }` task output, limited to [`MAX_LIST_ITEMS`] strings.
async fn generate_list(tasks: &TaskRegistry, task: AdTask, context: &str, key: &str) -> Vec<String> {
    let response = match tasks.run(task, &[("context", context)]).await {
        Ok(response) => response,
        Err(e) => {
            warn!(task = task.name(), "Generator failed: {e}");
            return Vec::new();
        }
    };

    let Some(object) = parse_json_object(&response) else {
        warn!(task = task.name(), "Generator returned non-JSON output: {response}");
        return Vec::new();
    };

    object
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .take(MAX_LIST_ITEMS)
                .collect()
        })
        .unwrap_or_default()
}

/// Picks or rewrites the best of the payload's headlines for this query.
/// Falls back to the first headline when the provider fails.
async fn engaging_headline(tasks: &TaskRegistry, headlines: &[String], user_input: &str) -> String {
    let Some(first) = headlines.first() else {
        return String::new();
    };

    let numbered = headlines
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{}. {h}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match tasks
        .run(
            AdTask::EngagingHeadline,
            &[("input", user_input), ("headlines", numbered.as_str())],
        )
        .await
    {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => first.clone(),
        Err(e) => {
            warn!("Headline generation failed, using first headline: {e}");
            first.clone()
        }
    }
}

async fn button_data(tasks: &TaskRegistry, payload: &Value) -> ButtonData {
    let context = payload.to_string();
    let response = match tasks.run(AdTask::ButtonData, &[("context", context.as_str())]).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Button data generation failed: {e}");
            return ButtonData::default();
        }
    };

    let Some(object) = parse_json_object(&response) else {
        warn!("Button data generator returned non-JSON output: {response}");
        return ButtonData::default();
    };

    let text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    ButtonData {
        question: text("question"),
        prompt: text("prompt"),
    }
}
