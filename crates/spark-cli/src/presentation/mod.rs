//! Shared CLI presentation utilities. Format-only: no domain transforms.

pub mod tables;

pub use tables::{format_optional, print_separator, truncate_string};
