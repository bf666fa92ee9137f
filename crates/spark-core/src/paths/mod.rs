//! Path utilities for spark's well-known per-user files.
//!
//! This module provides the canonical path resolution for:
//! - The llama-server state descriptor written by the launcher
//! - The model registry JSON file
//! - The default models directory
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - Environment overrides take priority over home-relative defaults

mod error;
mod platform;

pub use error::PathError;
pub use platform::{
    REGISTRY_FILE_ENV, STATE_FILE_ENV, default_models_dir, home_dir, llama_state_file,
    normalize_user_path, registry_file,
};
