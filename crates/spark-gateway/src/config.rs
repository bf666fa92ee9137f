//! Gateway configuration.

use std::path::PathBuf;
use std::time::Duration;

use spark_core::paths::{PathError, llama_state_file};
use spark_runtime::DEFAULT_SERVER_BINARY;
use thiserror::Error;
use url::Url;

/// Default vLLM location when `VLLM_URL` is unset.
pub const DEFAULT_VLLM_URL: &str = "http://localhost:8000";

/// Budget for health and model-listing probes.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Budget for generation calls. Generation is slow.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors raised while assembling a [`GatewayConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid vLLM URL '{url}': {reason}")]
    InvalidVllmUrl { url: String, reason: String },

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Settings shared by both backend gateways.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// llama-server state descriptor.
    pub state_file: PathBuf,
    /// Executable name the recorded PID's command line must contain.
    pub server_binary: String,
    /// Operator-configured vLLM base URL.
    pub vllm_url: String,
    pub probe_timeout: Duration,
    pub generation_timeout: Duration,
}

impl GatewayConfig {
    /// Defaults with the state file at its well-known location.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Ok(Self::new(llama_state_file()?, DEFAULT_VLLM_URL))
    }

    pub fn new(state_file: impl Into<PathBuf>, vllm_url: impl Into<String>) -> Self {
        Self {
            state_file: state_file.into(),
            server_binary: DEFAULT_SERVER_BINARY.to_string(),
            vllm_url: vllm_url.into(),
            probe_timeout: PROBE_TIMEOUT,
            generation_timeout: GENERATION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_vllm_url(mut self, url: impl Into<String>) -> Self {
        self.vllm_url = url.into();
        self
    }

    #[must_use]
    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = path.into();
        self
    }

    #[must_use]
    pub const fn with_timeouts(mut self, probe: Duration, generation: Duration) -> Self {
        self.probe_timeout = probe;
        self.generation_timeout = generation;
        self
    }

    /// Reject a vLLM URL that cannot be used as an HTTP base.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidVllmUrl {
            url: self.vllm_url.clone(),
            reason,
        };

        let parsed = Url::parse(&self.vllm_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }
        Ok(())
    }
}

/// Join an endpoint path onto a base URL, keeping any base path prefix.
pub fn endpoint_url(base_url: &str, path: &str) -> Result<String, String> {
    let mut parsed = Url::parse(base_url).map_err(|e| e.to_string())?;

    let normalized_base = parsed.path().trim_end_matches('/');
    let trimmed_path = path.trim_start_matches('/');
    let full_path = if normalized_base.is_empty() {
        format!("/{trimmed_path}")
    } else {
        format!("{normalized_base}/{trimmed_path}")
    };

    parsed.set_path(&full_path);
    parsed.set_query(None);
    Ok(parsed.to_string())
}
