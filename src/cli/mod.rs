//! CLI module for sqlfilter
//!
//! Provides command-line access to the filter for diagnostics:
//! - check: validate one JSON row read from stdin
//! - types: list the type names a dialect validates

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, check_row, load_columns, parse_row, run, run_command, types};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
