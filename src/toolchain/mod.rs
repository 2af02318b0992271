//! External tool discovery and process execution

pub mod runner;
pub mod tools;

pub use runner::{CommandLine, CommandOutput, CommandRunner, SystemRunner};
pub use tools::{Tool, Toolchain};
