//! Delete layer version command

use crate::cli::commands::signed_in_client;
use crate::cli::interactive;
use crate::cli::CommandContext;
use crate::cloud::LayerVersion;
use crate::core::types::LayerName;
use crate::toolchain::{CommandRunner, SystemRunner};
use anyhow::Result;
use colored::Colorize;
use serde_json::json;

/// Execute the delete command
pub fn execute(
    ctx: &CommandContext,
    name: String,
    version: u64,
    region: Option<String>,
    json: bool,
) -> Result<()> {
    let Some(deleted) = run(ctx, &SystemRunner, &name, version, region)? else {
        if !ctx.quiet {
            println!("{}", "Aborted, nothing was deleted".yellow());
        }
        return Ok(());
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "action": "delete",
                "deleted": deleted,
                "status": "success"
            }))?
        );
    } else if !ctx.quiet {
        println!(
            "{} Layer {} version {} has been deleted",
            "✓".green(),
            name.bold(),
            version.to_string().cyan()
        );
    }

    Ok(())
}

/// Delete one version, returning `None` if the user backed out
pub fn run<R: CommandRunner>(
    ctx: &CommandContext,
    runner: &R,
    name: &str,
    version: u64,
    region: Option<String>,
) -> Result<Option<LayerVersion>> {
    let name = LayerName::parse(name)?;
    let client = signed_in_client(ctx, runner)?;
    let region = client.resolve_region(region.as_deref().or(ctx.settings.region.as_deref()))?;

    if !interactive::confirm_delete(ctx, name.as_str(), version, &region)? {
        return Ok(None);
    }

    Ok(Some(client.delete_layer(name.as_str(), version, &region)?))
}
