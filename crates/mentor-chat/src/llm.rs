//! Remote language-model client.
//!
//! The pipeline talks to the model through the [`LanguageModel`] trait so
//! the remote call is a value-producing `Result`, not a side channel: every
//! failure mode is a typed [`LlmError`] variant and the caller decides how
//! to degrade. The shipped implementation speaks the OpenAI-compatible
//! chat-completions wire format with a bounded per-request timeout and no
//! retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mentor_core::config::LlmConfig;

/// A single message in a model conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A one-shot completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Ordered conversation to complete.
    pub messages: Vec<ChatMessage>,
    /// Ask the provider to return a single JSON object.
    pub json_mode: bool,
}

/// Failure modes of a remote model call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API key environment variable {0} is not set")]
    MissingApiKey(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed completion payload: {0}")]
    Malformed(String),
    #[error("empty completion content")]
    EmptyCompletion,
}

/// A remote text-completion backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run one completion. Implementations bound each call with a timeout
    /// and never retry; callers degrade on the failure variant.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

// =============================================================================
// OpenAI-compatible client
// =============================================================================

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    content: Option<String>,
}

/// Client for any OpenAI-compatible chat-completions endpoint.
#[derive(Debug)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Build a client from config, reading the API key from the environment.
    ///
    /// Fails when the key variable is unset; the service then runs with the
    /// deterministic offline paths only.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| LlmError::MissingApiKey(config.api_key_env.clone()))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    /// The model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let body = WireRequest {
            model: &self.model,
            messages: &request.messages,
            response_format: request
                .json_mode
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LlmError::Status(response.status().as_u16()));
        }

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(LlmError::EmptyCompletion);
        }
        Ok(content)
    }
}

// =============================================================================
// Test double
// =============================================================================
