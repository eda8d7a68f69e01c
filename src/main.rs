//! sqlfilter CLI entry point
//!
//! Parses arguments and dispatches via cli::run, printing errors to
//! stderr and exiting non-zero on failure.

use sqlfilter::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
