//! CLI command implementations
//!
//! Commands are thin wrappers over the filter: load metadata and config,
//! run the validator, print one JSON object.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::FilterConfig;
use crate::filter::{
    index_columns, ColumnInfo, Columns, Dialect, FilterError, Row, RuleSet, ValidationFailure,
    Validator,
};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments, installs logging, and dispatches the command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    init_logging();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Check {
            columns,
            config,
            dialect,
            all,
        } => check(&columns, config.as_deref(), dialect, all),
        Command::Types { config, dialect } => types(config.as_deref(), dialect),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Config file (if any) with the dialect override applied.
fn resolve_config(config: Option<&Path>, dialect: Option<Dialect>) -> CliResult<FilterConfig> {
    let mut resolved = match config {
        Some(path) => FilterConfig::load(path)?,
        None => FilterConfig::default(),
    };
    if let Some(dialect) = dialect {
        resolved.dialect = dialect;
    }
    debug!(dialect = %resolved.dialect, "resolved filter config");
    Ok(resolved)
}

/// Validate one row from stdin and report the verdict
pub fn check(
    columns_path: &Path,
    config: Option<&Path>,
    dialect: Option<Dialect>,
    all: bool,
) -> CliResult<()> {
    let config = resolve_config(config, dialect)?;
    let columns = load_columns(columns_path)?;
    let row = parse_row(read_request()?)?;

    let rules = config.rule_set();
    let failures = check_row(&rules, &row, &columns, all)?;

    if all {
        return write_response(json!({
            "valid": failures.is_empty(),
            "failures": failures,
        }));
    }

    match failures.first() {
        None => write_response(json!({ "valid": true })),
        Some(failure) => write_error(
            failure.code.code(),
            &failure.to_string(),
            Some(failure.column.as_str()),
        ),
    }
}

/// List the type names a dialect validates
pub fn types(config: Option<&Path>, dialect: Option<Dialect>) -> CliResult<()> {
    let config = resolve_config(config, dialect)?;
    let rules = config.rule_set();

    write_response(json!({
        "dialect": config.dialect,
        "types": rules.type_names(),
    }))
}

/// Run the validator over a row.
///
/// Fail-fast mode returns at most one failure.
pub fn check_row(
    rules: &RuleSet,
    row: &Row,
    columns: &Columns,
    all: bool,
) -> CliResult<Vec<ValidationFailure>> {
    let validator = Validator::new(rules);

    if all {
        return Ok(validator.collect_failures(row, columns)?);
    }

    match validator.assert(row, columns) {
        Ok(()) => Ok(Vec::new()),
        Err(FilterError::Invalid(failure)) => Ok(vec![failure]),
        Err(err) => Err(err.into()),
    }
}

/// Load a JSON array of column metadata
pub fn load_columns(path: &Path) -> CliResult<Columns> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::columns_error(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let columns: Vec<ColumnInfo> = serde_json::from_str(&content).map_err(|e| {
        CliError::columns_error(format!("Invalid column JSON in {}: {}", path.display(), e))
    })?;

    Ok(index_columns(columns))
}

/// The row must be a JSON object
pub fn parse_row(value: Value) -> CliResult<Row> {
    match value {
        Value::Object(row) => Ok(row),
        other => Err(CliError::invalid_row(format!(
            "Expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
