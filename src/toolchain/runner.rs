//! External process execution
//!
//! Every call to `aws`, `pip` or `npm` goes through [`CommandRunner`], so the
//! installer and cloud client can be driven by a scripted runner in tests.

use crate::core::error::{LayergenError, Result};
use std::fmt;
use std::process::Command;
use tracing::debug;

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// True when the arguments contain `needle` as a contiguous run
    pub fn has_args(&self, needle: &[&str]) -> bool {
        needle.is_empty()
            || self
                .args
                .windows(needle.len())
                .any(|w| w.iter().zip(needle).all(|(a, b)| a == b))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Best human-readable explanation of a failure
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs external programs to completion
pub trait CommandRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput>;
}

/// Runner backed by real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput> {
        debug!(command = %command, "spawning");

        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LayergenError::ProgramNotFound {
                        program: command.program.clone(),
                    }
                } else {
                    LayergenError::Io(e)
                }
            })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(program = %command.program, code = ?result.code, "finished");

        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted runner for unit tests

    use super::*;
    use std::cell::RefCell;

    type Handler = Box<dyn Fn(&CommandLine) -> CommandOutput>;

    /// Answers commands from a list of (argument pattern, handler) rules and
    /// records every command it sees
    #[derive(Default)]
    pub struct ScriptedRunner {
        rules: Vec<(Vec<String>, Handler)>,
        pub calls: RefCell<Vec<CommandLine>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn on<F>(mut self, pattern: &[&str], handler: F) -> Self
        where
            F: Fn(&CommandLine) -> CommandOutput + 'static,
        {
            self.rules.push((
                pattern.iter().map(|s| s.to_string()).collect(),
                Box::new(handler),
            ));
            self
        }

        pub fn ok(self, pattern: &[&str], stdout: &str) -> Self {
            let stdout = stdout.to_string();
            self.on(pattern, move |_| CommandOutput {
                code: Some(0),
                stdout: stdout.clone(),
                stderr: String::new(),
            })
        }

        pub fn fail(self, pattern: &[&str], code: i32, stderr: &str) -> Self {
            let stderr = stderr.to_string();
            self.on(pattern, move |_| CommandOutput {
                code: Some(code),
                stdout: String::new(),
                stderr: stderr.clone(),
            })
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }

        pub fn called_with(&self, pattern: &[&str]) -> bool {
            self.calls.borrow().iter().any(|c| c.has_args(pattern))
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, command: &CommandLine) -> Result<CommandOutput> {
            self.calls.borrow_mut().push(command.clone());
            for (pattern, handler) in &self.rules {
                let pattern: Vec<&str> = pattern.iter().map(String::as_str).collect();
                if command.has_args(&pattern) {
                    return Ok(handler(command));
                }
            }
            panic!("unexpected command: {}", command);
        }
    }
}
