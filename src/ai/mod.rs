//! AI-assisted task breakdown.
//!
//! [`SubtaskGenerator`] asks a chat model to split one complex task into three
//! to five simple ones and parses the dash-prefixed lines it sends back. The
//! model client is injected, so tests can drive the generator with a fake.

pub mod client;

use tracing::{debug, info};

use crate::error::GenerateError;
pub use client::{ChatClient, ChatMessage, ChatRequest, LlmConfig, OpenAiClient};

const SYSTEM_PROMPT: &str = "You are an expert task-management assistant who helps break complex tasks \
into simple, actionable steps.";

/// Generation settings sent with every breakdown request.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub max_completion_tokens: u32,
    pub reasoning_effort: Option<String>,
    pub verbosity: Option<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: client::DEFAULT_MODEL.to_string(),
            max_completion_tokens: client::DEFAULT_MAX_COMPLETION_TOKENS,
            reasoning_effort: Some("low".to_string()),
            verbosity: Some("medium".to_string()),
        }
    }
}

impl From<&LlmConfig> for GenerationSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_completion_tokens: config.max_completion_tokens,
            ..Self::default()
        }
    }
}

/// Splits task descriptions into subtasks using a chat model.
pub struct SubtaskGenerator<C: ChatClient> {
    client: C,
    settings: GenerationSettings,
}

impl<C: ChatClient> SubtaskGenerator<C> {
    pub fn new(client: C, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Ask the model for 3-5 subtasks of `description`.
    ///
    /// Makes at most one request. Never returns an empty list: zero parsed
    /// lines is [`GenerateError::NoSubtasks`].
    pub fn generate(&self, description: &str) -> Result<Vec<String>, GenerateError> {
        if !self.client.is_configured() {
            debug!("breakdown requested without an API key");
            return Err(GenerateError::NotConfigured);
        }

        let request = self.build_request(description);
        let raw = self.client.complete(&request).map_err(|e| {
            info!(error = %e, "breakdown request failed");
            GenerateError::from(e)
        })?;

        let subtasks = parse_subtasks(&raw);
        debug!(count = subtasks.len(), "parsed subtasks");
        if subtasks.is_empty() {
            return Err(GenerateError::NoSubtasks);
        }
        Ok(subtasks)
    }

    /// The request `generate` sends for `description`.
    pub fn build_request(&self, description: &str) -> ChatRequest {
        ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(breakdown_prompt(description)),
            ],
            max_completion_tokens: self.settings.max_completion_tokens,
            reasoning_effort: self.settings.reasoning_effort.clone(),
            verbosity: self.settings.verbosity.clone(),
        }
    }
}

/// User prompt asking for a dash-prefixed list of subtasks.
pub fn breakdown_prompt(description: &str) -> String {
    format!(
        "Break the following complex task down into a list of 3 to 5 simple, actionable tasks.\n\
         Task: {description}\n\
         \n\
         Response format:\n\
         - Subtask 1\n\
         - Subtask 2\n\
         - Subtask 3\n\
         - etc.\n\
         \n\
         Reply only with the list of subtasks, one per line, each starting with a dash."
    )
}

/// Keep lines that start with `-` (after trimming), minus the dash.
pub fn parse_subtasks(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(|line| line.trim().strip_prefix('-'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
