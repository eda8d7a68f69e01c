//! Validation engine
//!
//! Semantics, per column present in the row:
//! - null on an autoincrement column passes (the server assigns it)
//! - null on a not-null column fails INVALID_NOTNULL
//! - null on a nullable column passes
//! - otherwise the declared type is dispatched through the rule set
//! - a type with no rule passes unchecked
//!
//! The engine never mutates values and never talks to the database.

use serde_json::Value;
use tracing::{debug, trace};

use super::dialect::Dialect;
use super::errors::{FailureCode, FilterError, FilterResult, ValidationFailure};
use super::rules::RuleSet;
use super::types::{ColumnInfo, Columns, Row};

/// Checks rows against column metadata before a write is issued.
///
/// Holds only a shared reference to an immutable rule set, so one
/// validator may be used from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    rules: &'a RuleSet,
}

impl<'a> Validator<'a> {
    /// Creates a validator backed by the given rule set.
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Returns the rule set in use.
    pub fn rules(&self) -> &'a RuleSet {
        self.rules
    }

    /// Checks every value in the row, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// - `FilterError::UnknownColumn` if the row names a column with no
    ///   metadata (a caller bug, reported before any later column is read)
    /// - `FilterError::Invalid` for the first value that would not be
    ///   stored faithfully
    pub fn assert(&self, row: &Row, columns: &Columns) -> FilterResult<()> {
        for (name, value) in row {
            let column = lookup(columns, name)?;
            if let Some(code) = self.check(value, column) {
                return Err(ValidationFailure::new(code, &column.name).into());
            }
        }

        Ok(())
    }

    /// Checks every value in the row and returns all failures in row order.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownColumn` if the row names a column with
    /// no metadata; data failures are returned in the vector instead.
    pub fn collect_failures(
        &self,
        row: &Row,
        columns: &Columns,
    ) -> FilterResult<Vec<ValidationFailure>> {
        let mut failures = Vec::new();
        for (name, value) in row {
            let column = lookup(columns, name)?;
            if let Some(code) = self.check(value, column) {
                failures.push(ValidationFailure::new(code, &column.name));
            }
        }

        Ok(failures)
    }

    /// Checks a single value against its column.
    pub fn check(&self, value: &Value, column: &ColumnInfo) -> Option<FailureCode> {
        if value.is_null() {
            if column.autoinc {
                return None;
            }
            if column.notnull {
                debug!(column = %column.name, code = %FailureCode::InvalidNotnull, "null for not-null column");
                return Some(FailureCode::InvalidNotnull);
            }
            return None;
        }

        let Some(rule) = self.rules.get(&column.type_name) else {
            trace!(
                column = %column.name,
                type_name = %column.normalized_type(),
                "no rule for type, not validated"
            );
            return None;
        };

        let failure = rule.check(value, column);
        if let Some(code) = failure {
            debug!(
                column = %column.name,
                type_name = %column.type_name,
                code = %code,
                "value rejected"
            );
        }
        failure
    }
}

impl Validator<'static> {
    /// Creates a validator over the shared rules for a dialect.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::new(RuleSet::shared(dialect))
    }
}

fn lookup<'c>(columns: &'c Columns, name: &str) -> FilterResult<&'c ColumnInfo> {
    columns
        .get(name)
        .ok_or_else(|| FilterError::UnknownColumn(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::index_columns;
    use serde_json::json;

    fn employee_columns() -> Columns {
        index_columns(vec![
            ColumnInfo::new("id", "int").not_null().autoinc(),
            ColumnInfo::new("name", "varchar").size(10).not_null(),
            ColumnInfo::new("building", "smallint"),
            ColumnInfo::new("floor", "smallint").not_null(),
        ])
    }

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("row fixture must be an object"),
        }
    }

    #[test]
    fn test_valid_row_passes() {
        let validator = Validator::for_dialect(Dialect::Generic);
        let data = row(json!({
            "id": null,
            "name": "Mona",
            "building": "10",
            "floor": "99"
        }));

        assert!(validator.assert(&data, &employee_columns()).is_ok());
    }

    #[test]
    fn test_autoinc_null_passes_even_if_not_null() {
        let validator = Validator::for_dialect(Dialect::Generic);
        let data = row(json!({ "id": null }));
        assert!(validator.assert(&data, &employee_columns()).is_ok());
    }

    #[test]
    fn test_not_null_rejected() {
        let validator = Validator::for_dialect(Dialect::Generic);
        let data = row(json!({ "floor": null }));

        let err = validator.assert(&data, &employee_columns()).unwrap_err();
        let failure = err.failure().unwrap();
        assert_eq!(failure.code, FailureCode::InvalidNotnull);
        assert_eq!(failure.column, "floor");
    }

    #[test]
    fn test_nullable_null_passes() {
        let validator = Validator::for_dialect(Dialect::Generic);
        let data = row(json!({ "building": null }));
        assert!(validator.assert(&data, &employee_columns()).is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        let validator = Validator::for_dialect(Dialect::Generic);
        let data = row(json!({
            "name": "Maximiliana Long",
            "floor": 70000
        }));

        let err = validator.assert(&data, &employee_columns()).unwrap_err();
        assert_eq!(
            err,
            FilterError::Invalid(ValidationFailure::new(FailureCode::InvalidLength, "name"))
        );
    }

    #[test]
    fn test_collect_failures_reports_all() {
        let validator = Validator::for_dialect(Dialect::Generic);
        let data = row(json!({
            "name": "Maximiliana Long",
            "building": 1,
            "floor": 70000
        }));

        let failures = validator
            .collect_failures(&data, &employee_columns())
            .unwrap();
        assert_eq!(
            failures,
            vec![
                ValidationFailure::new(FailureCode::InvalidLength, "name"),
                ValidationFailure::new(FailureCode::InvalidRange, "floor"),
            ]
        );
    }

    #[test]
    fn test_unknown_column_is_fatal() {
        let validator = Validator::for_dialect(Dialect::Generic);
        let data = row(json!({ "salary": 100 }));

        let err = validator.assert(&data, &employee_columns()).unwrap_err();
        assert_eq!(err, FilterError::UnknownColumn("salary".into()));
        assert!(err.is_fatal());

        let err = validator
            .collect_failures(&data, &employee_columns())
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unregistered_type_passes() {
        let validator = Validator::for_dialect(Dialect::Generic);
        let columns = index_columns(vec![ColumnInfo::new("shape", "geometry").not_null()]);

        for value in [json!("POINT(1 1)"), json!(42), json!([1, 2]), json!({"x": 1})] {
            let data = row(json!({ "shape": value }));
            assert!(validator.assert(&data, &columns).is_ok());
        }
    }

    #[test]
    fn test_type_name_normalized_at_dispatch() {
        let validator = Validator::for_dialect(Dialect::Mysql);
        let column = ColumnInfo::new("n", "  INT   Unsigned ");
        assert_eq!(validator.check(&json!(-1), &column), Some(FailureCode::InvalidRange));
    }

    #[test]
    fn test_partial_row_only_checks_present_columns() {
        let validator = Validator::for_dialect(Dialect::Generic);
        // "name" and "floor" are not-null but absent from this update
        let data = row(json!({ "building": 3 }));
        assert!(validator.assert(&data, &employee_columns()).is_ok());
    }

    #[test]
    fn test_custom_rule_set() {
        let rules = RuleSet::empty();
        let validator = Validator::new(&rules);
        let column = ColumnInfo::new("n", "int").not_null();

        assert!(validator.rules().is_empty());
        assert_eq!(validator.check(&json!("abc"), &column), None);
        assert_eq!(
            validator.check(&Value::Null, &column),
            Some(FailureCode::InvalidNotnull)
        );
    }

    #[test]
    fn test_for_dialect_uses_shared_rules() {
        let validator = Validator::for_dialect(Dialect::Sqlsrv);
        assert!(std::ptr::eq(validator.rules(), RuleSet::shared(Dialect::Sqlsrv)));
        assert!(validator.rules().contains("datetime2"));
    }
}
