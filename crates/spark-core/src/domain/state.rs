//! Snapshot of a previously launched llama-server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validated server state descriptor.
///
/// Only produced by the state reader after the recorded process has been
/// confirmed alive and identified as llama-server. Never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerState {
    pub pid: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Launch timestamp, echoed verbatim in status reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Value>,
}

impl ServerState {
    pub const fn new(pid: u32) -> Self {
        Self {
            pid,
            host: None,
            port: None,
            model: None,
            started_at: None,
        }
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
