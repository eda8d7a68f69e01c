//! SQL data type filter
//!
//! A last-line check that a value bound for a column will be stored as-is
//! by the backend, rather than silently truncated, rounded, or rejected.
//! It is not an input sanitizer and knows nothing of business rules.
//!
//! # Design Principles
//!
//! - Checked immediately before an insert or update
//! - Only the columns present in the write are checked
//! - No coercion: values are never modified
//! - Deterministic: the same value and metadata always give the same verdict
//! - Unknown types pass unchecked
//! - First failure aborts the write

mod dialect;
mod errors;
mod numeric;
mod primitives;
mod rules;
mod types;
mod validator;

pub use dialect::{Dialect, DialectOptions, UnknownDialect};
pub use errors::{FailureCode, FilterError, FilterResult, Severity, ValidationFailure};
pub use numeric::{is_numeric, Numeric};
pub use primitives::{
    boolean_literal, byte_length, char_length, date, date_time, fixed_point, floating_point,
    integer_in_range, text_of, time, Literal,
};
pub use rules::{
    Limit, Precision, Rule, RuleSet, INT1, INT1_RANGE, INT2, INT2_RANGE, INT3, INT3_RANGE, INT4,
    INT4_RANGE, INT8, INT8_RANGE,
};
pub use types::{index_columns, normalize_type_name, ColumnInfo, Columns, Row};
pub use validator::Validator;
