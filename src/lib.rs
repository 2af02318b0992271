//! layergen - AWS Lambda layer builder
//!
//! layergen turns a `requirements.txt`, a `package.json` or a plain list of
//! packages into a Lambda layer: it installs the dependencies with pip or
//! npm into a staging directory, zips them under the path the runtime
//! expects (`python/` or `nodejs/node_modules/`) and publishes the zip with
//! the AWS CLI. Published versions can be listed and deleted.
//!
//! # Pipeline
//!
//! - **Installer** ([`packaging::Installer`]): runs the package manager
//! - **Archiver** ([`packaging::build_archive`]): builds and checks the zip
//! - **Cloud client** ([`cloud::LambdaClient`]): `aws lambda ...` calls
//!
//! All external programs run through [`toolchain::CommandRunner`].
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use layergen::packaging::{build_archive, Installer};
//! use layergen::toolchain::{SystemRunner, Toolchain};
//! use layergen::{DependencySource, LayerName, Runtime};
//! use std::path::{Path, PathBuf};
//!
//! let toolchain = Toolchain::default();
//! let staging = Path::new("/tmp/layergen-staging");
//! let source = DependencySource::Manifest(PathBuf::from("requirements.txt"));
//!
//! Installer::new(&SystemRunner, &toolchain).install(Runtime::Python, &source, staging)?;
//! let archive = build_archive(staging, Runtime::Python, &LayerName::parse("my-layer")?)?;
//! println!("{} files in {}", archive.file_count, archive.path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod cloud;
pub mod config;
pub mod core;
pub mod packaging;
pub mod toolchain;

// Re-export commonly used types
pub use crate::core::{
    error::{LayergenError, Result},
    types::{DependencySource, LayerName, LayerSpec, Runtime},
};

pub use cloud::{LambdaClient, LayerVersion};
