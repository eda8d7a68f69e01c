//! Filter error types
//!
//! Failure codes:
//! - INVALID_BOOLEAN, INVALID_DATE, INVALID_FSP, INVALID_INTEGER
//! - INVALID_LENGTH, INVALID_RANGE, INVALID_NOTNULL, INVALID_NUMBER
//! - INVALID_PRECISION, INVALID_SEPARATOR, INVALID_SCALE, INVALID_TIME
//! - INVALID_YEAR, INVALID_UNIXTIME (MySQL)
//! - INVALID_BIT (SQL Server)

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity levels for filter errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The write must be rejected
    Reject,
    /// Caller contract violated; the write cannot be judged at all
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Closed catalog of reasons a value would not survive a write intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    InvalidBoolean,
    InvalidDate,
    InvalidFsp,
    InvalidInteger,
    InvalidLength,
    InvalidRange,
    InvalidNotnull,
    InvalidNumber,
    InvalidPrecision,
    InvalidSeparator,
    InvalidScale,
    InvalidTime,
    /// MySQL `year` outside 1901..=2155 and not "0000"
    InvalidYear,
    /// MySQL `timestamp` outside the unix-time range
    InvalidUnixtime,
    /// SQL Server `bit` not one of 0, 1, true, false
    InvalidBit,
}

impl FailureCode {
    /// Returns the string tag for this failure
    pub fn code(&self) -> &'static str {
        match self {
            FailureCode::InvalidBoolean => "INVALID_BOOLEAN",
            FailureCode::InvalidDate => "INVALID_DATE",
            FailureCode::InvalidFsp => "INVALID_FSP",
            FailureCode::InvalidInteger => "INVALID_INTEGER",
            FailureCode::InvalidLength => "INVALID_LENGTH",
            FailureCode::InvalidRange => "INVALID_RANGE",
            FailureCode::InvalidNotnull => "INVALID_NOTNULL",
            FailureCode::InvalidNumber => "INVALID_NUMBER",
            FailureCode::InvalidPrecision => "INVALID_PRECISION",
            FailureCode::InvalidSeparator => "INVALID_SEPARATOR",
            FailureCode::InvalidScale => "INVALID_SCALE",
            FailureCode::InvalidTime => "INVALID_TIME",
            FailureCode::InvalidYear => "INVALID_YEAR",
            FailureCode::InvalidUnixtime => "INVALID_UNIXTIME",
            FailureCode::InvalidBit => "INVALID_BIT",
        }
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A value that failed its column's type check.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Invalid data for column '{column}': {code}")]
pub struct ValidationFailure {
    /// Why the value was rejected
    pub code: FailureCode,
    /// Column the value was bound for
    pub column: String,
}

impl ValidationFailure {
    pub fn new(code: FailureCode, column: impl Into<String>) -> Self {
        Self {
            code,
            column: column.into(),
        }
    }
}

/// Errors returned by the validation engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The row holds a value the backend would not store faithfully
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    /// The row names a column that has no metadata
    #[error("No column metadata for '{0}'; the column set must match the table")]
    UnknownColumn(String),
}

impl FilterError {
    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            FilterError::Invalid(_) => Severity::Reject,
            FilterError::UnknownColumn(_) => Severity::Fatal,
        }
    }

    /// Returns whether this is a programming error rather than bad data
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Returns the validation failure, if this is one
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            FilterError::Invalid(failure) => Some(failure),
            FilterError::UnknownColumn(_) => None,
        }
    }
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
