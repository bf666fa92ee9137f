//! Root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;
use spark_core::paths::{REGISTRY_FILE_ENV, STATE_FILE_ENV};
use spark_gateway::DEFAULT_VLLM_URL;

use crate::commands::Commands;

/// Query local llama.cpp and vLLM servers, or serve them over MCP.
#[derive(Parser)]
#[command(name = "spark")]
#[command(about = "Inference gateway for local llama.cpp and vLLM servers")]
#[command(version)]
pub struct Cli {
    /// llama-server state descriptor written by the launcher
    #[arg(long = "state-file", global = true, env = STATE_FILE_ENV)]
    pub state_file: Option<PathBuf>,

    /// Base URL of the vLLM server
    #[arg(long = "vllm-url", global = true, env = "VLLM_URL", default_value = DEFAULT_VLLM_URL)]
    pub vllm_url: String,

    /// Model registry JSON file
    #[arg(long = "registry-file", global = true, env = REGISTRY_FILE_ENV)]
    pub registry_file: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
