//! Backend families and their wire-format quirks.

use serde::{Deserialize, Serialize};

/// The two supported inference server families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// llama.cpp `llama-server`, discovered through its state descriptor.
    #[serde(rename = "llama")]
    LlamaCpp,
    /// vLLM OpenAI-compatible server at a configured URL.
    Vllm,
}

impl Backend {
    /// Name used in caller-facing messages.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::LlamaCpp => "llama-server",
            Self::Vllm => "vLLM",
        }
    }

    /// Prefix used for tool names (`llama_chat`, `vllm_status`, ...).
    pub const fn tool_prefix(self) -> &'static str {
        match self {
            Self::LlamaCpp => "llama",
            Self::Vllm => "vllm",
        }
    }

    /// Endpoint for chat completions (OpenAI-compatible on both backends).
    pub const fn chat_path(self) -> &'static str {
        "/v1/chat/completions"
    }

    /// Endpoint for raw completions.
    pub const fn completion_path(self) -> &'static str {
        match self {
            Self::LlamaCpp => "/completion",
            Self::Vllm => "/v1/completions",
        }
    }

    /// Token limit for the raw-completion request of this backend.
    pub const fn completion_limit(self, max_tokens: i64) -> TokenLimit {
        match self {
            Self::LlamaCpp => TokenLimit::NPredict(max_tokens),
            Self::Vllm => TokenLimit::MaxTokens(max_tokens),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tool_prefix())
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "llama" | "llama.cpp" | "llamacpp" => Ok(Self::LlamaCpp),
            "vllm" => Ok(Self::Vllm),
            other => Err(format!("unknown backend '{other}' (expected 'llama' or 'vllm')")),
        }
    }
}

/// Token-limit field of a generation request.
///
/// Flattened into the request body, so it serializes as either
/// `"max_tokens": n` or `"n_predict": n`. Values are passed through as
/// given; llama.cpp accepts `-1` for "until stop".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenLimit {
    #[serde(rename = "max_tokens")]
    MaxTokens(i64),
    #[serde(rename = "n_predict")]
    NPredict(i64),
}
