//! Core domain types for the spark inference gateway.
//!
//! This crate holds everything that is independent of I/O:
//! - The llama.cpp server state snapshot and its loopback-only resolution
//! - Chat messages and the system-prompt merge rule
//! - The vLLM model catalog shapes
//! - The caller-facing error taxonomy ([`GatewayError`])
//! - Path resolution and the on-disk model registry

#![deny(unsafe_code)]

pub mod domain;
pub mod error;
pub mod paths;
pub mod registry;

// Re-export commonly used types for convenience
pub use domain::{
    Backend, ChatMessage, ConnectionTarget, DEFAULT_HOST, DEFAULT_PORT, LOOPBACK_HOSTS,
    MessageRole, ModelCatalogEntry, ModelList, ServerState, TokenLimit, is_loopback_host,
    merge_system_prompt,
};
pub use error::{BODY_EXCERPT_LIMIT, GatewayError, OutcomeKind};
pub use paths::{PathError, default_models_dir, home_dir, llama_state_file, registry_file};
pub use registry::{ListedModel, ModelEntry, ModelRegistry, RegistryError, ResolvedModel};
