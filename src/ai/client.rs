//! Chat-completion client for OpenAI-compatible endpoints.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LlmError;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-5";
pub const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 300;

/// Connection and model settings, resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_completion_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_completion_tokens: DEFAULT_MAX_COMPLETION_TOKENS,
        }
    }
}

impl LlmConfig {
    /// The API key, if one is set and non-empty.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_completion_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Anything that can answer a chat completion request.
pub trait ChatClient {
    /// Whether a credential is available. Checked before any request is made.
    fn is_configured(&self) -> bool;

    /// Send one request and return the first choice's text.
    fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

/// Blocking HTTP client for OpenAI-compatible chat endpoints.
pub struct OpenAiClient {
    config: LlmConfig,
    http: reqwest::blocking::Client,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;
        Ok(Self { config, http })
    }
}

impl ChatClient for OpenAiClient {
    fn is_configured(&self) -> bool {
        self.config.credential().is_some()
    }

    fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let api_key = self.config.credential().unwrap_or_default();
        debug!(endpoint = %self.config.endpoint, model = %request.model, "sending chat request");

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(LlmError::Status { status: status.as_u16(), body });
        }

        let body = response.text().map_err(|e| LlmError::Transport(e.to_string()))?;
        parse_response(&body)
    }
}

/// Extract the first choice's content from a chat completion response body.
pub fn parse_response(body: &str) -> Result<String, LlmError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Decode(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .ok_or(LlmError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let req = ChatRequest {
            model: "gpt-5".into(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            max_completion_tokens: 300,
            reasoning_effort: Some("low".into()),
            verbosity: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["model"], "gpt-5");
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][1]["content"], "hi");
        assert_eq!(v["max_completion_tokens"], 300);
        assert_eq!(v["reasoning_effort"], "low");
        assert!(v.get("verbosity").is_none());
    }

    #[test]
    fn test_parse_response_takes_first_choice() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "  - a\n- b  "}},
                                   {"message": {"content": "ignored"}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "- a\n- b");
    }

    #[test]
    fn test_parse_response_errors() {
        assert!(matches!(parse_response("not json"), Err(LlmError::Decode(_))));
        assert!(matches!(parse_response(r#"{"choices": []}"#), Err(LlmError::EmptyResponse)));
        assert!(matches!(
            parse_response(r#"{"choices": [{"message": {"content": null}}]}"#),
            Err(LlmError::EmptyResponse)
        ));
    }

    #[test]
    fn test_blank_key_is_not_a_credential() {
        let mut config = LlmConfig::default();
        assert!(config.credential().is_none());
        config.api_key = Some("  ".into());
        assert!(config.credential().is_none());
        config.api_key = Some("sk-test".into());
        assert_eq!(config.credential(), Some("sk-test"));
    }

    #[test]
    fn test_client_without_key_is_unconfigured() {
        let client = OpenAiClient::new(LlmConfig::default()).unwrap();
        assert!(!client.is_configured());
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        let client = OpenAiClient::new(LlmConfig {
            endpoint: "http://127.0.0.1:9/v1/chat/completions".into(),
            api_key: Some("sk-test".into()),
            ..LlmConfig::default()
        })
        .unwrap();
        let req = ChatRequest {
            model: "gpt-5".into(),
            messages: vec![ChatMessage::user("hi")],
            max_completion_tokens: 10,
            reasoning_effort: None,
            verbosity: None,
        };
        assert!(matches!(client.complete(&req), Err(LlmError::Transport(_))));
    }
}
