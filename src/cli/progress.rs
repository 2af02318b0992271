//! Spinners for long-running external commands

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start a spinner on stderr, or a hidden one when progress is disabled
pub fn spinner(visible: bool, message: impl Into<String>) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
