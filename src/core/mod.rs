//! Core types and error handling for layergen
//!
//! This module contains the data types shared by the installer, archiver
//! and cloud client, plus the error taxonomy that drives exit codes.

pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{ErrorCategory, LayergenError, Result};
pub use types::{DependencySource, LayerName, LayerSpec, Runtime};
