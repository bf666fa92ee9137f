//! Named model registry backed by a JSON file.
//!
//! The registry maps model names (and aliases) to GGUF paths plus launch
//! hints. It is a CLI-facing surface; the gateway shares only the naming
//! convention with it.
//!
//! # Safety guarantees
//! - Atomic writes via temp file in the same directory + rename
//! - A missing file reads as the default, empty registry

mod error;
mod store;
mod types;

pub use error::RegistryError;
pub use store::ModelRegistry;
pub use types::{ListedModel, ModelEntry, NewModelEntry, RegistryConfig, RegistryDefaults, ResolvedModel};
