//! Integration tests driven through the library API and CliContext

mod cli_commands;
mod end_to_end;
mod support;
