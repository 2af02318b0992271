//! Global configuration management for layergen
//!
//! User settings live in ~/.layergen/config.toml and are merged with the
//! environment and command-line flags into a [`Settings`] value.

pub mod global_config;
pub mod settings;

// Re-export commonly used items
pub use global_config::{ConfigKey, GlobalConfig};
pub use settings::{EnvSnapshot, Overrides, Settings};
