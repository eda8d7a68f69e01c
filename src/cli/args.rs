//! CLI argument definitions using clap
//!
//! Commands:
//! - sqlfilter check --columns <path> [--config <path>] [--dialect <name>] [--all]
//! - sqlfilter types [--config <path>] [--dialect <name>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::filter::Dialect;

/// sqlfilter - reject values a SQL backend would silently coerce
#[derive(Parser, Debug)]
#[command(name = "sqlfilter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one JSON row object read from stdin
    Check {
        /// JSON array of column metadata for the table
        #[arg(long)]
        columns: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Dialect to validate for (overrides the config file)
        #[arg(long)]
        dialect: Option<Dialect>,

        /// Report every failing column instead of stopping at the first
        #[arg(long)]
        all: bool,
    },

    /// List the type names validated by a dialect
    Types {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Dialect to list (overrides the config file)
        #[arg(long)]
        dialect: Option<Dialect>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
