//! CLI entry point - the composition root.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use spark_cli::handlers::inference::{ChatArgs, CompleteArgs};
use spark_cli::{Cli, CliConfig, CliContext, CliError, Commands, handlers};

/// Logs go to stderr so stdout stays clean for MCP and piped output.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Some(command) = cli.command.as_ref() else {
        Cli::command()
            .print_help()
            .map_err(|e| CliError::Io(e.to_string()))?;
        return Ok(());
    };

    let ctx = CliContext::new(CliConfig::from_cli(&cli)?);

    match command {
        Commands::Status { backend } => handlers::inference::status(&ctx, *backend).await,
        Commands::Chat {
            message,
            backend,
            system_prompt,
            temperature,
            max_tokens,
            model,
        } => {
            let args = ChatArgs {
                backend: *backend,
                message: message.clone(),
                system_prompt: system_prompt.clone(),
                temperature: *temperature,
                max_tokens: *max_tokens,
                model: model.clone(),
            };
            handlers::inference::chat(&ctx, args).await;
        }
        Commands::Complete {
            prompt,
            backend,
            temperature,
            max_tokens,
            stop,
            model,
        } => {
            let args = CompleteArgs {
                backend: *backend,
                prompt: prompt.clone(),
                temperature: *temperature,
                max_tokens: *max_tokens,
                stop: stop.clone(),
                model: model.clone(),
            };
            handlers::inference::complete(&ctx, args).await;
        }
        Commands::Mcp { backend } => handlers::mcp::serve(&ctx, *backend).await?,
        Commands::Registry { command } => handlers::registry::execute(&ctx, command.clone())?,
        Commands::Paths => handlers::paths::execute(&ctx)?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1)))
        }
    }
}
