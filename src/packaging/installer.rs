//! Dependency installation through pip or npm

use crate::core::error::{LayergenError, Result};
use crate::core::types::{DependencySource, Runtime};
use crate::toolchain::{CommandLine, CommandRunner, Tool, Toolchain};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Lock file copied next to package.json when present
const NPM_LOCK_FILE: &str = "package-lock.json";

/// Check the dependency source without touching the filesystem or spawning
/// anything
pub fn validate_source(runtime: Runtime, source: &DependencySource) -> Result<()> {
    let DependencySource::Manifest(path) = source else {
        return Ok(());
    };

    if !path.is_file() {
        return Err(LayergenError::ManifestNotFound { path: path.clone() });
    }

    if runtime == Runtime::Nodejs && path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(LayergenError::usage(format!(
            "{} is not a {} manifest; the node runtime needs one",
            path.display(),
            runtime.manifest_file_name()
        )));
    }

    Ok(())
}

/// Materializes dependencies into a staging directory
pub struct Installer<'a, R: CommandRunner> {
    runner: &'a R,
    toolchain: &'a Toolchain,
}

impl<'a, R: CommandRunner> Installer<'a, R> {
    pub fn new(runner: &'a R, toolchain: &'a Toolchain) -> Self {
        Self { runner, toolchain }
    }

    /// Install dependencies under `<staging>/<runtime install dir>` and
    /// return that directory
    pub fn install(
        &self,
        runtime: Runtime,
        source: &DependencySource,
        staging: &Path,
    ) -> Result<PathBuf> {
        validate_source(runtime, source)?;

        let install_dir = staging.join(runtime.install_dir());
        std::fs::create_dir_all(&install_dir)?;

        let command = match runtime {
            Runtime::Python => self.pip_command(source, &install_dir),
            Runtime::Nodejs => self.npm_command(source, &install_dir)?,
        };

        info!(runtime = %runtime, dir = %install_dir.display(), "installing dependencies");
        let output = self
            .runner
            .run(&command)
            .map_err(|e| e.attribute_to(Tool::package_manager(runtime)))?;
        debug!(stdout = %output.stdout.trim(), "package manager output");

        if !output.success() {
            return Err(LayergenError::install(format!(
                "{} install failed: {}",
                runtime.package_manager(),
                output.failure_message()
            )));
        }

        Ok(install_dir)
    }

    fn pip_command(&self, source: &DependencySource, install_dir: &Path) -> CommandLine {
        let command = CommandLine::new(self.toolchain.program(&Tool::Pip))
            .args(["install", "--target"])
            .arg(install_dir.display().to_string());

        match source {
            DependencySource::Manifest(path) => {
                command.arg("-r").arg(path.display().to_string())
            },
            DependencySource::Packages(packages) => command.args(packages.iter().cloned()),
        }
    }

    fn npm_command(&self, source: &DependencySource, install_dir: &Path) -> Result<CommandLine> {
        let command = CommandLine::new(self.toolchain.program(&Tool::Npm))
            .args(["install", "--prefix"])
            .arg(install_dir.display().to_string());

        Ok(match source {
            DependencySource::Manifest(path) => {
                std::fs::copy(path, install_dir.join("package.json"))?;

                let lock_file = path.with_file_name(NPM_LOCK_FILE);
                if lock_file.is_file() {
                    std::fs::copy(&lock_file, install_dir.join(NPM_LOCK_FILE))?;
                }

                command.arg("--omit=dev")
            },
            DependencySource::Packages(packages) => command.args(packages.iter().cloned()),
        })
    }
}
