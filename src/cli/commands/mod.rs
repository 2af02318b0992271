//! CLI command implementations

pub mod completion;
pub mod config;
pub mod create;
pub mod delete;
pub mod list;

// Common utilities for commands
use crate::cli::CommandContext;
use crate::cloud::LambdaClient;
use crate::toolchain::{CommandRunner, Tool};
use anyhow::Result;

/// Client for the configured AWS CLI, after checking it exists and is
/// signed in
pub fn signed_in_client<'a, R: CommandRunner>(
    ctx: &'a CommandContext,
    runner: &'a R,
) -> Result<LambdaClient<'a, R>> {
    let settings = &ctx.settings;
    settings.toolchain.ensure_available(&[Tool::Aws])?;

    let client = LambdaClient::new(
        runner,
        settings.toolchain.program(&Tool::Aws),
        settings.profile.as_deref(),
    );
    client.verify_credentials()?;
    Ok(client)
}

/// Human-readable byte count
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
