//! CLI bootstrap, the composition root.
//!
//! Global arguments are resolved into a [`CliConfig`] once; handlers receive
//! a [`CliContext`] and never read the environment themselves.

use std::path::PathBuf;
use std::sync::Arc;

use spark_core::paths::{llama_state_file, normalize_user_path, registry_file};
use spark_core::{Backend, ModelRegistry};
use spark_gateway::{GatewayConfig, InferenceTools, LlamaGateway, VllmGateway};
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub gateway: GatewayConfig,
    pub registry_file: PathBuf,
}

impl CliConfig {
    /// Explicit flags (or their environment fallbacks) win over defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let state_file = match &cli.state_file {
            Some(path) => normalize_user_path(&path.to_string_lossy())?,
            None => llama_state_file()?,
        };
        let registry_file = match &cli.registry_file {
            Some(path) => normalize_user_path(&path.to_string_lossy())?,
            None => registry_file()?,
        };

        let gateway = GatewayConfig::new(state_file, cli.vllm_url.trim_end_matches('/'));
        gateway.validate()?;

        Ok(Self {
            gateway,
            registry_file,
        })
    }
}

/// Composed dependencies for command handlers.
pub struct CliContext {
    config: CliConfig,
}

impl CliContext {
    pub const fn new(config: CliConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Gateway for `backend`, behind the shared tool surface.
    pub fn tools(&self, backend: Backend) -> Arc<dyn InferenceTools> {
        debug!(%backend, "Building gateway");
        match backend {
            Backend::LlamaCpp => Arc::new(LlamaGateway::new(&self.config.gateway)),
            Backend::Vllm => Arc::new(VllmGateway::new(&self.config.gateway)),
        }
    }

    pub fn registry(&self) -> ModelRegistry {
        ModelRegistry::new(&self.config.registry_file)
    }
}
