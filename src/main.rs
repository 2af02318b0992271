//! layergen CLI
//!
//! Command-line interface for building and managing AWS Lambda layers.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use layergen::cli::commands::{self, config::ConfigArgs, create::CreateArgs};
use layergen::cli::{Cli, CommandContext, Commands};
use layergen::config::{EnvSnapshot, GlobalConfig, Overrides, Settings};
use layergen::core::error::ErrorCategory;
use layergen::LayergenError;

fn main() -> ExitCode {
    // Parse command line arguments; clap exits with status 2 on usage errors
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(exit_code(&err))
        },
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "layergen=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<LayergenError>()
        .map(LayergenError::exit_code)
        .unwrap_or_else(|| ErrorCategory::Other.exit_code())
}

fn run(cli: Cli) -> Result<()> {
    // These two never touch AWS or the toolchain
    match cli.command {
        Commands::Config {
            key,
            value,
            list,
            unset,
            show_origin,
            json,
        } => {
            return commands::config::execute(ConfigArgs {
                key,
                value,
                list,
                unset,
                show_origin,
                json,
            })
        },
        Commands::Completion { shell } => return commands::completion::execute(shell, cli.quiet),
        _ => {},
    }

    let config = GlobalConfig::load()?;
    let overrides = Overrides {
        region: cli.command.region().map(str::to_string),
        profile: cli.profile.clone(),
    };
    let settings = Settings::resolve(&config, &EnvSnapshot::capture(), &overrides);
    tracing::debug!(?settings, "resolved settings");

    let ctx = CommandContext {
        quiet: cli.quiet,
        yes: cli.yes,
        non_interactive: cli.non_interactive,
        ..CommandContext::new(settings)
    };

    match cli.command {
        Commands::List { region, name, json } => commands::list::execute(&ctx, region, name, json),
        Commands::Create {
            runtime,
            manifest,
            packages,
            name,
            region,
            description,
            output,
            dry_run,
            json,
        } => commands::create::execute(
            &ctx,
            CreateArgs {
                runtime,
                manifest,
                packages,
                name,
                region,
                description,
                output,
                dry_run,
                json,
            },
        ),
        Commands::Delete {
            name,
            version,
            region,
            json,
        } => commands::delete::execute(&ctx, name, version, region, json),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}
