//! Shared fixtures for spark-gateway integration tests.
//!
//! Each test binary uses a different subset.
#![allow(dead_code)]

pub mod backend;
pub mod state;
