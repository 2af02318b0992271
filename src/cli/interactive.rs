//! Interactive CLI prompts for user input
//!
//! `create` asks for whatever the command line left out, the way a guided
//! setup would. Without a terminal (or with --non-interactive) a missing
//! value is a usage error instead.

use crate::cli::CommandContext;
use crate::core::error::LayergenError;
use crate::core::types::{DependencySource, LayerName, Runtime};
use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};

/// Layer name from the flag, or ask for it
pub fn layer_name(ctx: &CommandContext, given: Option<String>) -> Result<LayerName> {
    if let Some(name) = given {
        return Ok(LayerName::parse(&name)?);
    }
    if !ctx.can_prompt() {
        return Err(LayergenError::usage("missing --name").into());
    }

    let name: String = Input::new()
        .with_prompt("Enter the AWS Lambda Layer name")
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            LayerName::parse(input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;

    Ok(LayerName::parse(&name)?)
}

/// Runtime from the flag, or ask for it
pub fn runtime(ctx: &CommandContext, given: Option<Runtime>) -> Result<Runtime> {
    if let Some(runtime) = given {
        return Ok(runtime);
    }
    if !ctx.can_prompt() {
        return Err(LayergenError::usage("missing --runtime (python or node)").into());
    }

    let labels: Vec<String> = Runtime::ALL
        .iter()
        .map(|r| format!("{} ({})", r.display_name(), ctx.settings.compatible_runtime(*r)))
        .collect();
    let choice = Select::new()
        .with_prompt("Select the runtime")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(Runtime::ALL[choice])
}

/// Dependency source from --manifest/--packages, or ask for packages
pub fn dependency_source(
    ctx: &CommandContext,
    manifest: Option<std::path::PathBuf>,
    packages: Option<String>,
) -> Result<DependencySource> {
    if let Some(path) = manifest {
        return Ok(DependencySource::Manifest(path));
    }
    if let Some(packages) = packages {
        return Ok(DependencySource::from_package_list(&packages)?);
    }
    if !ctx.can_prompt() {
        return Err(LayergenError::usage("missing --manifest or --packages").into());
    }

    let packages: String = Input::new()
        .with_prompt("Enter the packages you want to include (space-separated)")
        .interact_text()?;

    Ok(DependencySource::from_package_list(&packages)?)
}

/// Ask before deleting a layer version
pub fn confirm_delete(ctx: &CommandContext, name: &str, version: u64, region: &str) -> Result<bool> {
    if ctx.should_auto_accept() {
        return Ok(true);
    }
    if !ctx.can_prompt() {
        return Err(LayergenError::usage(
            "refusing to delete without confirmation; pass --yes to skip the prompt",
        )
        .into());
    }

    println!();
    println!("{}", "About to delete a layer version".yellow().bold());
    println!("  Layer: {}", name.cyan());
    println!("  Version: {}", version.to_string().cyan());
    println!("  Region: {}", region.cyan());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Functions still using this version keep working, but it cannot be attached again. Continue?")
        .default(false)
        .interact()?;

    Ok(confirmed)
}
