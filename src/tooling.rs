//! Tooling & Integration Layer
//!
//! CLI commands and their terminal formatting.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
