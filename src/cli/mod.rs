//! Command-line interface for layergen

use crate::core::types::Runtime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
pub mod context;
pub mod interactive;
pub mod progress;

pub use context::CommandContext;

/// layergen - AWS Lambda layer builder
#[derive(Parser, Debug)]
#[command(
    name = "layergen",
    version,
    about = "Build AWS Lambda layers from Python or Node.js dependencies",
    long_about = "layergen installs dependencies with pip or npm, zips them in the layout AWS Lambda expects, and publishes, lists or deletes layer versions through the AWS CLI."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Auto-answer yes to all prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Never prompt; missing options become errors
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// AWS CLI named profile
    #[arg(long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List layers, or the versions of one layer
    List {
        /// AWS region (default: configured region)
        #[arg(long)]
        region: Option<String>,

        /// Show every version of this layer instead of the latest of each
        #[arg(long)]
        name: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Install dependencies, build the layer zip and publish it
    Create {
        /// Runtime the layer targets
        #[arg(long, value_enum, ignore_case = true)]
        runtime: Option<Runtime>,

        /// requirements.txt or package.json to install from
        #[arg(long, conflicts_with = "packages")]
        manifest: Option<PathBuf>,

        /// Space-separated packages to install
        #[arg(long)]
        packages: Option<String>,

        /// Layer name
        #[arg(long)]
        name: Option<String>,

        /// AWS region (default: configured region)
        #[arg(long)]
        region: Option<String>,

        /// Description stored with the layer version
        #[arg(long)]
        description: Option<String>,

        /// Also write the layer zip to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Build the archive without publishing it
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete one layer version
    Delete {
        /// Layer name
        #[arg(long)]
        name: String,

        /// Version number to delete
        #[arg(long)]
        version: u64,

        /// AWS region (default: configured region)
        #[arg(long)]
        region: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage global configuration
    Config {
        /// Configuration key to get/set
        key: Option<String>,
        /// Configuration value to set
        value: Option<String>,
        /// List all configuration values
        #[arg(short, long)]
        list: bool,
        /// Unset a configuration value
        #[arg(long)]
        unset: bool,
        /// Show global configuration file location
        #[arg(long)]
        show_origin: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Commands {
    /// Region passed on the command line, if the subcommand takes one
    pub fn region(&self) -> Option<&str> {
        match self {
            Commands::List { region, .. }
            | Commands::Create { region, .. }
            | Commands::Delete { region, .. } => region.as_deref(),
            Commands::Config { .. } | Commands::Completion { .. } => None,
        }
    }
}
