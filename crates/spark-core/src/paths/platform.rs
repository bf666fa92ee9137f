//! Home-relative path resolution with environment overrides.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable overriding the llama-server state descriptor path.
pub const STATE_FILE_ENV: &str = "SPARK_LLAMA_STATE_FILE";

/// Environment variable overriding the model registry path.
pub const REGISTRY_FILE_ENV: &str = "SPARK_REGISTRY_FILE";

const STATE_FILE_NAME: &str = ".llama-server-state.json";
const REGISTRY_RELATIVE: &str = "llama-spark-plugin/config/models.json";
const MODELS_DIR_NAME: &str = "models";

/// The current user's home directory.
pub fn home_dir() -> Result<PathBuf, PathError> {
    dirs::home_dir().ok_or(PathError::NoHomeDir)
}

/// Location of the llama-server state descriptor.
///
/// Resolution order:
/// 1. `SPARK_LLAMA_STATE_FILE` environment variable
/// 2. `~/.llama-server-state.json`
pub fn llama_state_file() -> Result<PathBuf, PathError> {
    if let Some(path) = env_override(STATE_FILE_ENV) {
        return normalize_user_path(&path);
    }
    Ok(home_dir()?.join(STATE_FILE_NAME))
}

/// Location of the model registry.
///
/// Resolution order:
/// 1. `SPARK_REGISTRY_FILE` environment variable
/// 2. `~/llama-spark-plugin/config/models.json`
pub fn registry_file() -> Result<PathBuf, PathError> {
    if let Some(path) = env_override(REGISTRY_FILE_ENV) {
        return normalize_user_path(&path);
    }
    Ok(home_dir()?.join(REGISTRY_RELATIVE))
}

/// Default directory that relative registry paths resolve against (`~/models`).
pub fn default_models_dir() -> Result<PathBuf, PathError> {
    Ok(home_dir()?.join(MODELS_DIR_NAME))
}

fn env_override(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = home_dir()?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}
