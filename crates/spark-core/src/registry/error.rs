//! Registry error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::paths::PathError;

/// Errors returned by [`super::ModelRegistry`] operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No model with this name (or alias) is registered.
    #[error("Model '{0}' not found in registry")]
    NotFound(String),

    /// The registry file could not be read or written.
    #[error("Failed to access registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The registry file exists but is not valid registry JSON.
    #[error("Registry {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The registry location could not be resolved.
    #[error(transparent)]
    Path(#[from] PathError),
}
