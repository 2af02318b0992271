//! Core data types for layergen

use crate::core::error::{LayergenError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Maximum length AWS accepts for a layer name
pub const MAX_LAYER_NAME_LEN: usize = 64;

/// Maximum length AWS accepts for a layer version description
pub const MAX_DESCRIPTION_LEN: usize = 256;

/// Lambda runtime family a layer is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Python,
    #[value(name = "node", alias = "nodejs")]
    #[serde(rename = "nodejs")]
    Nodejs,
}

impl Runtime {
    pub const ALL: [Runtime; 2] = [Runtime::Python, Runtime::Nodejs];

    /// Directory every archive entry must live under
    pub fn layer_prefix(&self) -> &'static str {
        match self {
            Runtime::Python => "python/",
            Runtime::Nodejs => "nodejs/node_modules/",
        }
    }

    /// Directory the package manager installs into, relative to staging
    pub fn install_dir(&self) -> &'static str {
        match self {
            Runtime::Python => "python",
            Runtime::Nodejs => "nodejs",
        }
    }

    /// Lambda runtime identifier used when the configuration does not override it
    pub fn default_compatible_runtime(&self) -> &'static str {
        match self {
            Runtime::Python => "python3.12",
            Runtime::Nodejs => "nodejs20.x",
        }
    }

    pub fn manifest_file_name(&self) -> &'static str {
        match self {
            Runtime::Python => "requirements.txt",
            Runtime::Nodejs => "package.json",
        }
    }

    pub fn package_manager(&self) -> &'static str {
        match self {
            Runtime::Python => "pip",
            Runtime::Nodejs => "npm",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Runtime::Python => "Python",
            Runtime::Nodejs => "Node.js",
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runtime::Python => write!(f, "python"),
            Runtime::Nodejs => write!(f, "nodejs"),
        }
    }
}

/// Validated Lambda layer name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LayerName(String);

impl LayerName {
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = |reason: &str| LayergenError::InvalidLayerName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if name.len() > MAX_LAYER_NAME_LEN {
            return Err(invalid("name cannot be longer than 64 characters"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(invalid(
                "only letters, numbers, dashes and underscores are allowed",
            ));
        }

        Ok(LayerName(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the dependencies of a layer come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySource {
    /// `requirements.txt` or `package.json`
    Manifest(PathBuf),
    /// Package specifiers handed straight to the package manager
    Packages(Vec<String>),
}

impl DependencySource {
    /// Split a space-separated package list, rejecting an empty one
    pub fn from_package_list(packages: &str) -> Result<Self> {
        let packages: Vec<String> = packages.split_whitespace().map(str::to_string).collect();
        if packages.is_empty() {
            return Err(LayergenError::usage("no packages given"));
        }
        Ok(DependencySource::Packages(packages))
    }

    /// Short summary: the manifest's file name or the package list
    pub fn describe(&self) -> String {
        match self {
            DependencySource::Manifest(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            DependencySource::Packages(packages) => packages.join(" "),
        }
    }
}

/// Everything needed to build and publish one layer version
#[derive(Debug, Clone)]
pub struct LayerSpec {
    pub name: LayerName,
    pub runtime: Runtime,
    pub source: DependencySource,
    pub region: String,
    /// Lambda runtime identifier, e.g. `python3.12`
    pub compatible_runtime: String,
    pub description: Option<String>,
}

impl LayerSpec {
    /// Description to publish, generated from the dependencies when none was given
    pub fn publish_description(&self) -> String {
        let description = match &self.description {
            Some(description) => description.clone(),
            None => format!(
                "{} dependencies from {}",
                self.runtime.display_name(),
                self.source.describe()
            ),
        };
        description.chars().take(MAX_DESCRIPTION_LEN).collect()
    }
}
