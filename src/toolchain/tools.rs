//! External binaries layergen depends on

use crate::core::error::{LayergenError, Result};
use crate::core::types::Runtime;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The external programs used by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Aws,
    Pip,
    Npm,
}

impl Tool {
    pub fn package_manager(runtime: Runtime) -> Self {
        match runtime {
            Runtime::Python => Tool::Pip,
            Runtime::Nodejs => Tool::Npm,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::Aws => write!(f, "the AWS CLI"),
            Tool::Pip => write!(f, "pip"),
            Tool::Npm => write!(f, "npm"),
        }
    }
}

/// Resolved program names and the search path used to find them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub aws: String,
    pub pip: String,
    pub npm: String,
    /// Value of `PATH` captured when settings were resolved
    pub search_path: Option<OsString>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            aws: "aws".to_string(),
            pip: "pip".to_string(),
            npm: "npm".to_string(),
            search_path: None,
        }
    }
}

impl Toolchain {
    pub fn program(&self, tool: &Tool) -> &str {
        match tool {
            Tool::Aws => &self.aws,
            Tool::Pip => &self.pip,
            Tool::Npm => &self.npm,
        }
    }

    /// Locate a tool, either at an explicit path or on the search path
    pub fn locate(&self, tool: &Tool) -> Option<PathBuf> {
        let program = self.program(tool);
        let candidate = Path::new(program);

        if candidate.components().count() > 1 {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }

        let search_path = self.search_path.as_ref()?;
        std::env::split_paths(search_path).find_map(|dir| {
            executable_names(program)
                .into_iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file())
        })
    }

    /// Fail with the first tool that cannot be found
    pub fn ensure_available(&self, tools: &[Tool]) -> Result<()> {
        for tool in tools {
            match self.locate(tool) {
                Some(path) => debug!(tool = ?tool, path = %path.display(), "found tool"),
                None => {
                    return Err(LayergenError::ToolNotFound {
                        tool: *tool,
                        program: self.program(tool).to_string(),
                    })
                },
            }
        }
        Ok(())
    }
}

#[cfg(windows)]
fn executable_names(program: &str) -> Vec<String> {
    vec![
        program.to_string(),
        format!("{}.exe", program),
        format!("{}.cmd", program),
    ]
}

#[cfg(not(windows))]
fn executable_names(program: &str) -> Vec<String> {
    vec![program.to_string()]
}
