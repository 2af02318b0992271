//! Global configuration management
//!
//! Provides Git-like global configuration stored in ~/.layergen/config.toml

use crate::core::error::{LayergenError, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "LAYERGEN_CONFIG_DIR";

/// Global configuration for layergen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// AWS defaults
    pub aws: AwsConfig,
    /// External program overrides
    pub tools: ToolsConfig,
    /// Lambda runtime identifiers per runtime family
    pub runtimes: RuntimesConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// Region used when no --region flag is given
    pub region: Option<String>,
    /// Named AWS CLI profile
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub aws: Option<String>,
    pub pip: Option<String>,
    pub npm: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimesConfig {
    /// e.g. `python3.11`
    pub python: Option<String>,
    /// e.g. `nodejs18.x`
    pub nodejs: Option<String>,
}

/// Configuration key for getting and setting values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    AwsRegion,
    AwsProfile,
    ToolsAws,
    ToolsPip,
    ToolsNpm,
    RuntimesPython,
    RuntimesNodejs,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 7] = [
        ConfigKey::AwsRegion,
        ConfigKey::AwsProfile,
        ConfigKey::ToolsAws,
        ConfigKey::ToolsPip,
        ConfigKey::ToolsNpm,
        ConfigKey::RuntimesPython,
        ConfigKey::RuntimesNodejs,
    ];

    pub fn parse(key: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| {
                LayergenError::configuration(format!(
                    "unknown key '{}' (valid keys: {})",
                    key,
                    Self::ALL
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::AwsRegion => "aws.region",
            ConfigKey::AwsProfile => "aws.profile",
            ConfigKey::ToolsAws => "tools.aws",
            ConfigKey::ToolsPip => "tools.pip",
            ConfigKey::ToolsNpm => "tools.npm",
            ConfigKey::RuntimesPython => "runtimes.python",
            ConfigKey::RuntimesNodejs => "runtimes.nodejs",
        }
    }
}

impl GlobalConfig {
    /// Load global configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load configuration from a file, returning defaults if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        toml::from_str(&content).map_err(|e| {
            LayergenError::configuration(format!(
                "failed to parse {}: {}",
                config_path.display(),
                e
            ))
        })
    }

    /// Save global configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            LayergenError::configuration(format!("failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Get the path to the global configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir).join("config.toml"));
        }

        let user_dirs = UserDirs::new().ok_or(LayergenError::HomeDirectoryNotFound)?;
        Ok(user_dirs.home_dir().join(".layergen").join("config.toml"))
    }

    fn slot(&self, key: ConfigKey) -> &Option<String> {
        match key {
            ConfigKey::AwsRegion => &self.aws.region,
            ConfigKey::AwsProfile => &self.aws.profile,
            ConfigKey::ToolsAws => &self.tools.aws,
            ConfigKey::ToolsPip => &self.tools.pip,
            ConfigKey::ToolsNpm => &self.tools.npm,
            ConfigKey::RuntimesPython => &self.runtimes.python,
            ConfigKey::RuntimesNodejs => &self.runtimes.nodejs,
        }
    }

    fn slot_mut(&mut self, key: ConfigKey) -> &mut Option<String> {
        match key {
            ConfigKey::AwsRegion => &mut self.aws.region,
            ConfigKey::AwsProfile => &mut self.aws.profile,
            ConfigKey::ToolsAws => &mut self.tools.aws,
            ConfigKey::ToolsPip => &mut self.tools.pip,
            ConfigKey::ToolsNpm => &mut self.tools.npm,
            ConfigKey::RuntimesPython => &mut self.runtimes.python,
            ConfigKey::RuntimesNodejs => &mut self.runtimes.nodejs,
        }
    }

    /// Get a configuration value
    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    /// Set a configuration value
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(LayergenError::configuration(format!(
                "{} cannot be empty",
                key.as_str()
            )));
        }

        match key {
            ConfigKey::RuntimesPython if !value.starts_with("python") => {
                return Err(LayergenError::configuration(
                    "runtimes.python must be a Python runtime identifier such as python3.12",
                ));
            },
            ConfigKey::RuntimesNodejs if !value.starts_with("nodejs") => {
                return Err(LayergenError::configuration(
                    "runtimes.nodejs must be a Node.js runtime identifier such as nodejs20.x",
                ));
            },
            _ => {},
        }

        *self.slot_mut(key) = Some(value.to_string());
        Ok(())
    }

    /// Unset a configuration value
    pub fn unset(&mut self, key: ConfigKey) {
        *self.slot_mut(key) = None;
    }

    /// List all configuration values that are set
    pub fn list(&self) -> Vec<(&'static str, String)> {
        ConfigKey::ALL
            .iter()
            .filter_map(|key| self.get(*key).map(|v| (key.as_str(), v.to_string())))
            .collect()
    }
}
