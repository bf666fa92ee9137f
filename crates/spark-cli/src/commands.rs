//! Subcommands of the `spark` binary.

use clap::Subcommand;
use spark_core::Backend;
use spark_gateway::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show whether the backend is running
    Status {
        /// Backend to query (llama or vllm)
        #[arg(short, long, default_value = "llama")]
        backend: Backend,
    },

    /// Send a single-turn chat message
    Chat {
        /// User message
        message: String,
        #[arg(short, long, default_value = "llama")]
        backend: Backend,
        /// System prompt prepended to the conversation
        #[arg(short, long)]
        system_prompt: Option<String>,
        /// Sampling temperature
        #[arg(short, long, default_value_t = DEFAULT_TEMPERATURE)]
        temperature: f64,
        /// Maximum tokens to generate
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS, allow_negative_numbers = true)]
        max_tokens: i64,
        /// Model to use (vLLM only; defaults to the first served model)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Complete a raw prompt
    Complete {
        /// Text to complete
        prompt: String,
        #[arg(short, long, default_value = "llama")]
        backend: Backend,
        #[arg(short, long, default_value_t = DEFAULT_TEMPERATURE)]
        temperature: f64,
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS, allow_negative_numbers = true)]
        max_tokens: i64,
        /// Stop sequence (repeatable)
        #[arg(long = "stop")]
        stop: Vec<String>,
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Serve the backend's tools over MCP on stdin/stdout
    Mcp {
        #[arg(short, long, default_value = "llama")]
        backend: Backend,
    },

    /// Manage the named model registry
    Registry {
        #[command(subcommand)]
        command: RegistryCommand,
    },

    /// Show resolved paths and endpoints
    Paths,
}

#[derive(Debug, Clone, Subcommand)]
pub enum RegistryCommand {
    /// Add or replace a model entry
    Add {
        /// Registry name
        name: String,
        /// GGUF file, absolute or relative to the models directory
        path: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        context_size: Option<u32>,
        #[arg(long)]
        gpu_layers: Option<u32>,
        /// Alternative name (repeatable)
        #[arg(long = "alias")]
        aliases: Vec<String>,
    },

    /// Remove a model entry
    Remove { name: String },

    /// List registered models
    List,

    /// Show one model by name or alias
    Get { name: String },
}
