//! Create layer command
//!
//! install → archive → publish, strictly in that order. The staging
//! directory is temporary and disappears when the command returns.

use crate::cli::commands::{format_bytes, signed_in_client};
use crate::cli::interactive;
use crate::cli::progress::spinner;
use crate::cli::CommandContext;
use crate::cloud::LayerVersion;
use crate::core::error::LayergenError;
use crate::core::types::{LayerSpec, Runtime};
use crate::packaging::{build_archive, validate_source, Installer};
use crate::toolchain::{CommandRunner, SystemRunner, Tool};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for the create command
#[derive(Debug, Default)]
pub struct CreateArgs {
    pub runtime: Option<Runtime>,
    pub manifest: Option<PathBuf>,
    pub packages: Option<String>,
    pub name: Option<String>,
    pub region: Option<String>,
    pub description: Option<String>,
    pub output: Option<PathBuf>,
    pub dry_run: bool,
    pub json: bool,
}

/// What a create run produced
#[derive(Debug, Serialize)]
pub struct CreateOutcome {
    pub layer: String,
    pub runtime: Runtime,
    pub compatible_runtime: String,
    pub file_count: usize,
    pub size_bytes: u64,
    /// Where the zip was saved with --output
    pub archive: Option<PathBuf>,
    /// The published version, absent on a dry run
    pub version: Option<LayerVersion>,
}

/// Execute the create command
pub fn execute(ctx: &CommandContext, args: CreateArgs) -> Result<()> {
    let json = args.json;
    let outcome = run(ctx, &SystemRunner, args)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if let Some(version) = &outcome.version {
        if !ctx.quiet {
            println!(
                "{} Layer {} version {} has been published",
                "✓".green(),
                outcome.layer.bold(),
                version.version.to_string().cyan()
            );
        }
        // The ARN is the one line scripts want, even with --quiet
        println!("{}", version.arn);
    } else if !ctx.quiet {
        println!(
            "{} Dry run: layer {} was built but not published",
            "✓".green(),
            outcome.layer.bold()
        );
    }

    Ok(())
}

/// Run the create pipeline with the given process runner
pub fn run<R: CommandRunner>(ctx: &CommandContext, runner: &R, args: CreateArgs) -> Result<CreateOutcome> {
    let settings = &ctx.settings;
    let show_progress = ctx.show_progress(args.json);
    let chatty = !ctx.quiet && !args.json;

    let name = interactive::layer_name(ctx, args.name)?;
    let runtime = interactive::runtime(ctx, args.runtime)?;
    let source = interactive::dependency_source(ctx, args.manifest, args.packages)?;
    let compatible_runtime = settings.compatible_runtime(runtime).to_string();

    if chatty {
        println!(
            "You selected {} ({})",
            runtime.display_name(),
            compatible_runtime.cyan()
        );
    }

    // Everything that can be checked locally is checked before the first
    // process runs
    validate_source(runtime, &source)?;
    let package_manager = Tool::package_manager(runtime);
    if args.dry_run {
        settings.toolchain.ensure_available(&[package_manager])?;
    } else {
        settings
            .toolchain
            .ensure_available(&[package_manager, Tool::Aws])?;
    }

    let publisher = if args.dry_run {
        None
    } else {
        let client = signed_in_client(ctx, runner)?;
        let region = client.resolve_region(args.region.as_deref().or(settings.region.as_deref()))?;
        Some((client, region))
    };

    let staging = tempfile::Builder::new().prefix("layergen-").tempdir()?;
    info!(staging = %staging.path().display(), "created staging directory");

    let pb = spinner(
        show_progress,
        format!("Installing dependencies with {}...", runtime.package_manager()),
    );
    let installed = Installer::new(runner, &settings.toolchain).install(runtime, &source, staging.path());
    pb.finish_and_clear();
    installed?;
    if chatty {
        println!("{} Installed dependencies", "✓".green());
    }

    let archive = build_archive(staging.path(), runtime, &name)?;
    if chatty {
        println!(
            "{} Built {} ({} files, {})",
            "✓".green(),
            format!("{}.zip", name).bold(),
            archive.file_count,
            format_bytes(archive.size_bytes)
        );
    }

    let saved = match &args.output {
        Some(output) => {
            save_copy(&archive.path, output)?;
            if chatty {
                println!("{} Saved archive to {}", "✓".green(), output.display());
            }
            Some(output.clone())
        },
        None => None,
    };

    let version = match publisher {
        Some((client, region)) => {
            let spec = LayerSpec {
                name: name.clone(),
                runtime,
                source,
                region,
                compatible_runtime: compatible_runtime.clone(),
                description: args.description,
            };

            let pb = spinner(
                show_progress,
                format!("Publishing {} to {}...", spec.name, spec.region),
            );
            let published = client.create_layer(&spec, &archive);
            pb.finish_and_clear();
            Some(published?)
        },
        None => None,
    };

    Ok(CreateOutcome {
        layer: name.to_string(),
        runtime,
        compatible_runtime,
        file_count: archive.file_count,
        size_bytes: archive.size_bytes,
        archive: saved,
        version,
    })
}

/// Copy the finished zip to the --output path
fn save_copy(archive: &Path, output: &Path) -> crate::core::error::Result<()> {
    let copy = || -> std::io::Result<u64> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(archive, output)
    };
    copy().map_err(|e| {
        LayergenError::packaging(format!("cannot save archive to {}: {}", output.display(), e))
    })?;
    Ok(())
}
