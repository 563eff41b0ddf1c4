//! Tooling & Integration Layer
//!
//! Command-line parsing, command execution and report formatting.

pub mod cli;
mod format;

pub use cli::{Cli, CliContext, Commands, PathOverrides};
pub use format::{
    format_index_text, format_maintenance_report_text, format_plugins_text,
    format_section_heading,
};
