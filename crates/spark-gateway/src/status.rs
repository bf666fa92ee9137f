//! Status reports returned by the `status` tool.

use serde::Serialize;
use serde_json::Value;
use spark_core::OutcomeKind;

/// Running llama-server, as reported after a successful health probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlamaRunning {
    pub status: &'static str,
    pub model: String,
    pub port: Option<u16>,
    pub started_at: Option<Value>,
    pub health: Value,
}

/// Running vLLM server with at least one model loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VllmRunning {
    pub status: &'static str,
    pub url: String,
    pub models: Vec<String>,
    pub default_model: Option<String>,
}

/// Outcome of a status check. Both variants are successful calls.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusReport {
    Llama(LlamaRunning),
    Vllm(VllmRunning),
    /// Server absent, rejected or not answering.
    Unavailable { kind: OutcomeKind, message: String },
}

impl StatusReport {
    pub fn unavailable(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self::Unavailable {
            kind,
            message: message.into(),
        }
    }

    pub const fn is_running(&self) -> bool {
        !matches!(self, Self::Unavailable { .. })
    }

    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::Llama(_) | Self::Vllm(_) => OutcomeKind::Success,
            Self::Unavailable { kind, .. } => *kind,
        }
    }

    /// Pretty JSON for running servers, the diagnostic text otherwise.
    pub fn render(&self) -> String {
        let json = match self {
            Self::Llama(report) => serde_json::to_string_pretty(report),
            Self::Vllm(report) => serde_json::to_string_pretty(report),
            Self::Unavailable { message, .. } => return message.clone(),
        };
        json.unwrap_or_else(|e| format!("Error: failed to encode status: {e}"))
    }
}
