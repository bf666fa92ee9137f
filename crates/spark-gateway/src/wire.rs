//! Wire formats for the two backend families.
//!
//! Requests are strongly typed per shape (chat, raw completion) and built per
//! backend, so the `max_tokens`/`n_predict` split and the optional `model`
//! field are decided in one place. Response types only model the fields the
//! gateway extracts.

use serde::{Deserialize, Serialize};
use spark_core::{Backend, ChatMessage, TokenLimit};

/// Returned in place of generated text when the backend sent no choices.
pub const NO_RESPONSE: &str = "Error: No response from model";

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /v1/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest<'a> {
    /// Present only for the vLLM path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    pub messages: &'a [ChatMessage],
    pub temperature: f64,
    #[serde(flatten)]
    pub limit: TokenLimit,
    pub stream: bool,
}

impl<'a> ChatRequest<'a> {
    pub const fn new(
        model: Option<&'a str>,
        messages: &'a [ChatMessage],
        temperature: f64,
        max_tokens: i64,
    ) -> Self {
        Self {
            model,
            messages,
            temperature,
            limit: TokenLimit::MaxTokens(max_tokens),
            stream: false,
        }
    }
}

/// Body of the backend-specific raw completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    pub prompt: &'a str,
    pub temperature: f64,
    #[serde(flatten)]
    pub limit: TokenLimit,
    pub stream: bool,
    /// Omitted when there are no stop sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<&'a [String]>,
}

impl<'a> CompletionRequest<'a> {
    pub fn for_backend(
        backend: Backend,
        model: Option<&'a str>,
        prompt: &'a str,
        temperature: f64,
        max_tokens: i64,
        stop: Option<&'a [String]>,
    ) -> Self {
        Self {
            model,
            prompt,
            temperature,
            limit: backend.completion_limit(max_tokens),
            stream: false,
            stop: stop.filter(|s| !s.is_empty()),
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Response from `/v1/chat/completions`. `choices` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice; [`NO_RESPONSE`] when there are none.
    pub fn into_text(self) -> String {
        match self.choices.into_iter().next() {
            Some(choice) => choice
                .message
                .and_then(|m| m.content)
                .unwrap_or_default(),
            None => NO_RESPONSE.to_string(),
        }
    }
}

/// Response from llama.cpp's native `/completion`.
#[derive(Debug, Clone, Deserialize)]
pub struct NativeCompletionResponse {
    #[serde(default)]
    pub content: Option<String>,
}

impl NativeCompletionResponse {
    pub fn into_text(self) -> String {
        self.content.unwrap_or_default()
    }
}

/// Response from the OpenAI-compatible `/v1/completions`. `choices` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct TextCompletionResponse {
    pub choices: Vec<TextChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextChoice {
    #[serde(default)]
    pub text: Option<String>,
}

impl TextCompletionResponse {
    pub fn into_text(self) -> String {
        match self.choices.into_iter().next() {
            Some(choice) => choice.text.unwrap_or_default(),
            None => NO_RESPONSE.to_string(),
        }
    }
}
