//! Paths command handler.
//!
//! Prints every resolved location in `key = value` form for diagnosing
//! configuration issues.

use spark_core::default_models_dir;

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub fn execute(ctx: &CliContext) -> Result<(), CliError> {
    let config = ctx.config();
    let models_dir = match ctx.registry().load() {
        Ok(registry) => registry.models_dir,
        Err(_) => default_models_dir()?.display().to_string(),
    };

    println!("state_file    = {}", config.gateway.state_file.display());
    println!("registry_file = {}", config.registry_file.display());
    println!("models_dir    = {models_dir}");
    println!("vllm_url      = {}", config.gateway.vllm_url);
    println!("server_binary = {}", config.gateway.server_binary);
    Ok(())
}
