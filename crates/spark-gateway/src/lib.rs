//! Inference gateway for local llama.cpp and vLLM servers.
//!
//! Each backend exposes the same three operations through
//! [`InferenceTools`]: `status`, `chat` and `complete`. Every operation
//! returns a `String`; failures are rendered through
//! [`spark_core::GatewayError`] rather than raised.
//!
//! # Structure
//!
//! - [`llama`]: llama-server discovered through its state descriptor
//! - [`vllm`]: vLLM at a configured URL, with per-call model resolution
//! - [`forward`]: bounded-timeout HTTP forwarding and error normalization
//! - [`wire`]: request and response bodies per backend family

#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod forward;
pub mod llama;
pub mod status;
pub mod tools;
pub mod vllm;
pub mod wire;

pub use catalog::ModelResolver;
pub use config::{
    ConfigError, DEFAULT_VLLM_URL, GENERATION_TIMEOUT, GatewayConfig, PROBE_TIMEOUT, endpoint_url,
};
pub use llama::{LLAMA_HEALTH_FAILED, LLAMA_NOT_RUNNING, LlamaGateway};
pub use status::{LlamaRunning, StatusReport, VllmRunning};
pub use tools::{
    ChatParams, CompleteParams, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, InferenceTools, render,
};
pub use vllm::VllmGateway;
pub use wire::NO_RESPONSE;
