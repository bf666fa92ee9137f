//! Command handlers.
//!
//! Handlers are thin: resolve CLI input, call the gateway or registry, and
//! print. Gateway outcomes (including failures) are printed as returned;
//! only CLI-level failures surface as [`crate::CliError`].

pub mod inference;
pub mod mcp;
pub mod paths;
pub mod registry;
