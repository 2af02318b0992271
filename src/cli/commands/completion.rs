use crate::cli::Cli;
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

const BIN_NAME: &str = "layergen";

/// Generate shell completion scripts
///
/// Only the script goes to stdout so the output can be eval'd directly;
/// installation hints go to stderr.
pub fn execute(shell: Shell, quiet: bool) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, &mut io::stdout());

    if !quiet {
        eprintln!();
        eprintln!("{}", install_hint(shell));
    }

    Ok(())
}

fn install_hint(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash => "# Add to ~/.bashrc: eval \"$(layergen completion bash)\"",
        Shell::Zsh => "# Add to ~/.zshrc: eval \"$(layergen completion zsh)\"",
        Shell::Fish => {
            "# Save with: layergen completion fish > ~/.config/fish/completions/layergen.fish"
        },
        Shell::PowerShell => {
            "# Add to your PowerShell profile: Invoke-Expression (& layergen completion powershell)"
        },
        Shell::Elvish => {
            "# Save with: layergen completion elvish > ~/.config/elvish/completions/layergen.elv"
        },
        _ => "# Please refer to your shell's documentation for installing completion scripts.",
    }
}
