//! Command-line adapter for the spark inference gateway.
//!
//! `main.rs` is the composition root; everything it wires is defined here so
//! the parser and handlers stay testable.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

pub use bootstrap::{CliConfig, CliContext};
pub use commands::{Commands, RegistryCommand};
pub use error::CliError;
pub use parser::Cli;
