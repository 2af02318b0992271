//! Effective settings for a single invocation
//!
//! Configuration file, environment and command-line flags are merged once,
//! here. Everything downstream receives a [`Settings`] value instead of
//! looking at the process environment.

use crate::config::global_config::GlobalConfig;
use crate::core::types::Runtime;
use crate::toolchain::Toolchain;
use std::ffi::OsString;

/// Environment variables layergen understands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    pub layergen_region: Option<String>,
    pub aws_region: Option<String>,
    pub aws_default_region: Option<String>,
    pub aws_profile: Option<String>,
    pub aws_bin: Option<String>,
    pub pip_bin: Option<String>,
    pub npm_bin: Option<String>,
    pub path: Option<OsString>,
}

impl EnvSnapshot {
    pub fn capture() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            layergen_region: var("LAYERGEN_REGION"),
            aws_region: var("AWS_REGION"),
            aws_default_region: var("AWS_DEFAULT_REGION"),
            aws_profile: var("AWS_PROFILE"),
            aws_bin: var("LAYERGEN_AWS"),
            pip_bin: var("LAYERGEN_PIP"),
            npm_bin: var("LAYERGEN_NPM"),
            path: std::env::var_os("PATH"),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub region: Option<String>,
    pub profile: Option<String>,
}

/// Resolved settings passed into the installer and cloud client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Explicit region, `None` means ask the AWS CLI for its default
    pub region: Option<String>,
    /// Named profile handed to the AWS CLI with --profile
    pub profile: Option<String>,
    pub toolchain: Toolchain,
    pub python_runtime: String,
    pub nodejs_runtime: String,
}

impl Settings {
    pub fn resolve(config: &GlobalConfig, env: &EnvSnapshot, overrides: &Overrides) -> Self {
        let region = overrides
            .region
            .clone()
            .or_else(|| env.layergen_region.clone())
            .or_else(|| config.aws.region.clone())
            .or_else(|| env.aws_region.clone())
            .or_else(|| env.aws_default_region.clone());

        // AWS_PROFILE is already honoured by the AWS CLI itself
        let profile = overrides
            .profile
            .clone()
            .or_else(|| config.aws.profile.clone());

        let defaults = Toolchain::default();
        let toolchain = Toolchain {
            aws: env
                .aws_bin
                .clone()
                .or_else(|| config.tools.aws.clone())
                .unwrap_or(defaults.aws),
            pip: env
                .pip_bin
                .clone()
                .or_else(|| config.tools.pip.clone())
                .unwrap_or(defaults.pip),
            npm: env
                .npm_bin
                .clone()
                .or_else(|| config.tools.npm.clone())
                .unwrap_or(defaults.npm),
            search_path: env.path.clone(),
        };

        Self {
            region,
            profile,
            toolchain,
            python_runtime: config
                .runtimes
                .python
                .clone()
                .unwrap_or_else(|| Runtime::Python.default_compatible_runtime().to_string()),
            nodejs_runtime: config
                .runtimes
                .nodejs
                .clone()
                .unwrap_or_else(|| Runtime::Nodejs.default_compatible_runtime().to_string()),
        }
    }

    /// Lambda runtime identifier to publish a layer as
    pub fn compatible_runtime(&self, runtime: Runtime) -> &str {
        match runtime {
            Runtime::Python => &self.python_runtime,
            Runtime::Nodejs => &self.nodejs_runtime,
        }
    }
}
