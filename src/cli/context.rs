//! Per-invocation options shared by every command

use crate::config::Settings;

/// Resolved settings plus the global flags, passed explicitly to commands
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub settings: Settings,
    pub quiet: bool,
    pub yes: bool,
    pub non_interactive: bool,
    /// Whether stdin is attached to a terminal
    pub stdin_is_tty: bool,
    /// Whether stderr is attached to a terminal
    pub stderr_is_tty: bool,
}

impl CommandContext {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            quiet: false,
            yes: false,
            non_interactive: false,
            stdin_is_tty: atty::is(atty::Stream::Stdin),
            stderr_is_tty: atty::is(atty::Stream::Stderr),
        }
    }

    /// Check if we may ask the user questions
    pub fn can_prompt(&self) -> bool {
        !self.non_interactive && self.stdin_is_tty
    }

    /// Check if we should auto-accept prompts (yes flag OR non-interactive mode)
    pub fn should_auto_accept(&self) -> bool {
        self.yes || self.non_interactive
    }

    /// Spinners go to stderr and only make sense on a terminal
    pub fn show_progress(&self, json: bool) -> bool {
        !self.quiet && !json && self.stderr_is_tty
    }
}
