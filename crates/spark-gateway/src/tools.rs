//! Backend-agnostic tool surface.
//!
//! Adapters (MCP server, CLI) talk to [`InferenceTools`]. Every method
//! returns a `String`: failures are rendered through the error taxonomy,
//! never raised.

use async_trait::async_trait;
use serde::Deserialize;
use spark_core::{Backend, ChatMessage, GatewayError};

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: i64 = 2048;

const fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

const fn default_max_tokens() -> i64 {
    DEFAULT_MAX_TOKENS
}

/// Arguments of the `chat` tool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatParams {
    pub messages: Vec<ChatMessage>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i64,
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Ignored by the llama.cpp backend, which serves a single model.
    #[serde(default)]
    pub model: Option<String>,
}

impl ChatParams {
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: None,
            model: None,
        }
    }

    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Arguments of the `complete` tool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompleteParams {
    pub prompt: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i64,
    #[serde(default)]
    pub stop: Option<Vec<String>>,
    #[serde(default)]
    pub model: Option<String>,
}

impl CompleteParams {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            stop: None,
            model: None,
        }
    }

    #[must_use]
    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }
}

/// The three tools every backend exposes.
#[async_trait]
pub trait InferenceTools: Send + Sync {
    fn backend(&self) -> Backend;

    /// Structured status JSON, or a plain diagnostic when unavailable.
    async fn status(&self) -> String;

    /// Chat completion text, or a rendered error.
    async fn chat(&self, params: ChatParams) -> String;

    /// Raw completion text, or a rendered error.
    async fn complete(&self, params: CompleteParams) -> String;
}

/// Collapse a typed outcome into the caller-facing string.
pub fn render(outcome: Result<String, GatewayError>) -> String {
    outcome.unwrap_or_else(|e| e.to_string())
}
