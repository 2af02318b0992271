//! List layers command

use crate::cli::commands::signed_in_client;
use crate::cli::progress::spinner;
use crate::cli::CommandContext;
use crate::cloud::LayerVersion;
use crate::core::types::LayerName;
use crate::toolchain::{CommandRunner, SystemRunner};
use anyhow::Result;
use colored::Colorize;
use tabled::{Table, Tabled};

/// One table row per layer version
#[derive(Tabled)]
struct LayerRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: u64,
    #[tabled(rename = "Runtimes")]
    runtimes: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "ARN")]
    arn: String,
}

impl From<&LayerVersion> for LayerRow {
    fn from(version: &LayerVersion) -> Self {
        Self {
            name: version.name.clone(),
            version: version.version,
            runtimes: if version.compatible_runtimes.is_empty() {
                "-".to_string()
            } else {
                version.compatible_runtimes.join(", ")
            },
            created: version
                .created_at()
                .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| version.created.clone()),
            arn: version.arn.clone(),
        }
    }
}

/// Execute the list command
pub fn execute(ctx: &CommandContext, region: Option<String>, name: Option<String>, json: bool) -> Result<()> {
    let versions = fetch(ctx, &SystemRunner, region, name.as_deref(), json)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&versions)?);
        return Ok(());
    }

    if versions.is_empty() {
        if !ctx.quiet {
            match &name {
                Some(name) => println!("{}", format!("No versions found for layer '{}'", name).yellow()),
                None => println!("{}", "No layers found".yellow()),
            }
            println!("  → Use 'layergen create' to publish one");
        }
        return Ok(());
    }

    println!("{}", render_table(&versions));
    if !ctx.quiet {
        println!("{}", format!("Total: {}", versions.len()).cyan());
    }

    Ok(())
}

/// Look up the layer versions to show
pub fn fetch<R: CommandRunner>(
    ctx: &CommandContext,
    runner: &R,
    region: Option<String>,
    name: Option<&str>,
    json: bool,
) -> Result<Vec<LayerVersion>> {
    let name = name.map(LayerName::parse).transpose()?;
    let client = signed_in_client(ctx, runner)?;
    let region = client.resolve_region(region.as_deref().or(ctx.settings.region.as_deref()))?;

    let pb = spinner(ctx.show_progress(json), format!("Listing layers in {}...", region));
    let versions = match name {
        Some(name) => client.list_layer_versions(name.as_str(), &region),
        None => client.list_layers(&region),
    };
    pb.finish_and_clear();

    Ok(versions?)
}

fn render_table(versions: &[LayerVersion]) -> String {
    let rows: Vec<LayerRow> = versions.iter().map(LayerRow::from).collect();
    Table::new(rows).to_string()
}
