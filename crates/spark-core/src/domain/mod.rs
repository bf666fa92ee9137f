//! Domain types shared by the gateway, runtime and adapters.

mod backend;
mod catalog;
mod chat;
mod state;
mod target;

pub use backend::{Backend, TokenLimit};
pub use catalog::{ModelCatalogEntry, ModelList};
pub use chat::{ChatMessage, MessageRole, merge_system_prompt};
pub use state::ServerState;
pub use target::{ConnectionTarget, DEFAULT_HOST, DEFAULT_PORT, LOOPBACK_HOSTS, is_loopback_host};
