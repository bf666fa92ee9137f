//! Registry command handlers.

use spark_core::registry::NewModelEntry;
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::commands::RegistryCommand;
use crate::error::CliError;
use crate::presentation::{format_optional, print_separator, truncate_string};

pub fn execute(ctx: &CliContext, command: RegistryCommand) -> Result<(), CliError> {
    match command {
        RegistryCommand::Add {
            name,
            path,
            description,
            context_size,
            gpu_layers,
            aliases,
        } => add(
            ctx,
            NewModelEntry {
                name,
                path,
                description,
                context_size,
                gpu_layers,
                aliases,
            },
        ),
        RegistryCommand::Remove { name } => remove(ctx, &name),
        RegistryCommand::List => list(ctx),
        RegistryCommand::Get { name } => get(ctx, &name),
    }
}

fn add(ctx: &CliContext, new: NewModelEntry) -> Result<(), CliError> {
    if new.name.trim().is_empty() {
        return Err(CliError::Arguments("model name cannot be empty".into()));
    }
    let name = new.name.clone();
    let entry = ctx.registry().add(new)?;
    debug!(name = %name, path = %entry.path, "Registered model");
    println!("Added model '{name}' -> {}", entry.path);
    Ok(())
}

fn remove(ctx: &CliContext, name: &str) -> Result<(), CliError> {
    let removed = ctx.registry().remove(name)?;
    println!("Removed model '{name}' ({})", removed.path);
    println!("Note: the model file remains on disk.");
    Ok(())
}

fn list(ctx: &CliContext) -> Result<(), CliError> {
    let registry = ctx.registry();
    let models = registry.list()?;

    if models.is_empty() {
        println!("No models registered in {}.", registry.path().display());
        println!("Use 'spark registry add <name> <path>' to add one.");
        return Ok(());
    }

    println!(
        "{:<20} {:<8} {:<8} {:<20} Path",
        "Name", "Context", "Exists", "Aliases"
    );
    print_separator(90);

    for model in models {
        println!(
            "{:<20} {:<8} {:<8} {:<20} {}",
            truncate_string(&model.name, 19),
            format_optional(model.entry.context_size.as_ref(), "--"),
            if model.exists { "yes" } else { "no" },
            truncate_string(&model.entry.aliases.join(","), 19),
            model.resolved_path.display()
        );
    }
    Ok(())
}

fn get(ctx: &CliContext, name: &str) -> Result<(), CliError> {
    let resolved = ctx.registry().get(name)?;
    let json = serde_json::to_string_pretty(&resolved)
        .map_err(|e| CliError::Io(format!("failed to encode model: {e}")))?;
    println!("{json}");
    Ok(())
}
