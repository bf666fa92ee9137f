//! CLI-specific error types and exit codes.
//!
//! Gateway outcomes are printed, never raised; only failures of the CLI
//! itself (configuration, registry, I/O) become a [`CliError`].

use spark_core::{PathError, RegistryError};
use spark_gateway::ConfigError;
use spark_mcp::McpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid command-line input.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Registry lookup or persistence failure.
    #[error("Registry error: {0}")]
    Registry(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Exit code following sysexits.h where one fits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Registry(_) => 1,
            Self::Io(_) => 74,     // EX_IOERR
            Self::Config(_) => 78, // EX_CONFIG
        }
    }
}

impl From<RegistryError> for CliError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Path(path_err) => path_err.into(),
            other => Self::Registry(other.to_string()),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::EmptyPath => Self::Arguments(err.to_string()),
            other => Self::Config(other.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Path(path_err) => path_err.into(),
            other @ ConfigError::InvalidVllmUrl { .. } => Self::Config(other.to_string()),
        }
    }
}

impl From<McpError> for CliError {
    fn from(err: McpError) -> Self {
        Self::Io(err.to_string())
    }
}
