//! Error types for layergen

use crate::toolchain::Tool;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for layergen operations
#[derive(Error, Debug)]
pub enum LayergenError {
    /// Package manager errors
    #[error("Install failed: {reason}")]
    Install { reason: String },

    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Archive construction errors
    #[error("Packaging failed: {reason}")]
    Packaging { reason: String },

    #[error("No dependencies were installed under {layer_root}; refusing to publish an empty layer")]
    EmptyLayer { layer_root: String },

    #[error("Archive error")]
    Zip(#[from] zip::result::ZipError),

    #[error("Directory walk failed")]
    Walk(#[from] walkdir::Error),

    /// AWS errors
    #[error("AWS error: {reason}")]
    Cloud { reason: String },

    #[error("Layer {name} version {version} does not exist in {region}")]
    LayerVersionNotFound {
        name: String,
        version: u64,
        region: String,
    },

    #[error("Not signed in to AWS: {reason}")]
    NotSignedIn { reason: String },

    /// Invocation errors
    #[error("{reason}")]
    Usage { reason: String },

    #[error("Invalid layer name '{name}': {reason}")]
    InvalidLayerName { name: String, reason: String },

    #[error("No AWS region specified. Pass --region, set AWS_DEFAULT_REGION or configure the AWS CLI")]
    RegionNotSet,

    /// Required binary is not available
    #[error("'{program}' was not found. Please install {tool} before running layergen")]
    ToolNotFound { tool: Tool, program: String },

    /// A process could not be spawned because its program does not exist
    #[error("'{program}' could not be started: no such file")]
    ProgramNotFound { program: String },

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// I/O errors
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

/// Failure category, used to pick the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Install,
    Packaging,
    Cloud,
    Usage,
    Config,
    Other,
}

impl ErrorCategory {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCategory::Other => 1,
            ErrorCategory::Usage => 2,
            ErrorCategory::Install => 3,
            ErrorCategory::Packaging => 4,
            ErrorCategory::Cloud => 5,
            ErrorCategory::Config => 6,
        }
    }
}

impl LayergenError {
    /// Create a new install error
    pub fn install(reason: impl Into<String>) -> Self {
        Self::Install {
            reason: reason.into(),
        }
    }

    /// Create a new packaging error
    pub fn packaging(reason: impl Into<String>) -> Self {
        Self::Packaging {
            reason: reason.into(),
        }
    }

    /// Create a new cloud error
    pub fn cloud(reason: impl Into<String>) -> Self {
        Self::Cloud {
            reason: reason.into(),
        }
    }

    /// Create a new usage error
    pub fn usage(reason: impl Into<String>) -> Self {
        Self::Usage {
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Install { .. } | Self::ManifestNotFound { .. } => ErrorCategory::Install,
            Self::Packaging { .. } | Self::EmptyLayer { .. } | Self::Zip(_) | Self::Walk(_) => {
                ErrorCategory::Packaging
            },
            Self::Cloud { .. } | Self::LayerVersionNotFound { .. } | Self::NotSignedIn { .. } => {
                ErrorCategory::Cloud
            },
            Self::Usage { .. } | Self::InvalidLayerName { .. } | Self::RegionNotSet => {
                ErrorCategory::Usage
            },
            // The AWS CLI is a cloud concern, pip and npm are install concerns
            Self::ToolNotFound { tool: Tool::Aws, .. } => ErrorCategory::Cloud,
            Self::ToolNotFound { .. } => ErrorCategory::Install,
            Self::Configuration { .. } | Self::HomeDirectoryNotFound => ErrorCategory::Config,
            Self::ProgramNotFound { .. } | Self::Io(_) | Self::Json(_) => ErrorCategory::Other,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.category().exit_code()
    }

    /// Name the tool behind a process that failed to start
    pub fn attribute_to(self, tool: Tool) -> Self {
        match self {
            Self::ProgramNotFound { program } => Self::ToolNotFound { tool, program },
            other => other,
        }
    }
}

/// Result type alias for layergen operations
pub type Result<T> = std::result::Result<T, LayergenError>;
