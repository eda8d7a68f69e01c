//! Filter Invariant Tests
//!
//! End-to-end checks of the validation engine:
//! - Null handling precedes type dispatch
//! - Unknown types pass unchecked
//! - Boundaries are exact for every integer width
//! - Byte length and character length diverge on multi-byte input
//! - Dialect lower bounds are not cross-applied
//! - Validation is deterministic and safe to share across threads

use sqlfilter::filter::{
    index_columns, ColumnInfo, Columns, Dialect, FailureCode, FilterError, Row, RuleSet,
    ValidationFailure, Validator,
};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("row must be an object, got {other}"),
    }
}

fn single(column: ColumnInfo) -> Columns {
    index_columns(vec![column])
}

/// Validate one value for one column under a dialect.
fn verdict(dialect: Dialect, column: ColumnInfo, value: Value) -> Option<FailureCode> {
    let name = column.name.clone();
    let columns = single(column);
    let mut data = Row::new();
    data.insert(name, value);

    match Validator::for_dialect(dialect).assert(&data, &columns) {
        Ok(()) => None,
        Err(FilterError::Invalid(failure)) => Some(failure.code),
        Err(err) => panic!("unexpected error: {err}"),
    }
}

// =============================================================================
// Null Handling Tests
// =============================================================================

/// Not-null without autoincrement rejects null for every type, known or not.
#[test]
fn test_not_null_rejects_null_for_any_type() {
    for type_name in ["int", "varchar", "date", "geometry", "bit", "year"] {
        for dialect in Dialect::ALL {
            let column = ColumnInfo::new("c", type_name).not_null();
            assert_eq!(
                verdict(dialect, column, Value::Null),
                Some(FailureCode::InvalidNotnull),
                "{dialect} {type_name}"
            );
        }
    }
}

/// Autoincrement accepts null regardless of other metadata.
#[test]
fn test_autoinc_accepts_null() {
    for type_name in ["int", "bigint unsigned", "varchar", "geometry"] {
        let column = ColumnInfo::new("id", type_name).size(1).not_null().autoinc();
        assert_eq!(verdict(Dialect::Mysql, column, Value::Null), None);
    }
}

/// Autoincrement does not exempt a supplied value from its type check.
#[test]
fn test_autoinc_value_still_checked() {
    let column = ColumnInfo::new("id", "int").not_null().autoinc();
    assert_eq!(
        verdict(Dialect::Generic, column, json!("abc")),
        Some(FailureCode::InvalidNumber)
    );
}

// =============================================================================
// Dispatch Tests
// =============================================================================

/// A type with no rule passes any value.
#[test]
fn test_unregistered_type_passes_anything() {
    for dialect in Dialect::ALL {
        for value in [json!("x".repeat(1000)), json!(-1), json!(true), json!([1])] {
            let column = ColumnInfo::new("c", "uuid").size(1);
            assert_eq!(verdict(dialect, column, value), None);
        }
    }
}

/// Dialect-only types are unvalidated under other dialects.
#[test]
fn test_dialect_types_do_not_leak() {
    let year = ColumnInfo::new("y", "year");
    assert_eq!(verdict(Dialect::Mysql, year.clone(), json!(1800)), Some(FailureCode::InvalidYear));
    assert_eq!(verdict(Dialect::Pgsql, year, json!(1800)), None);

    let bit = ColumnInfo::new("b", "bit");
    assert_eq!(verdict(Dialect::Sqlsrv, bit.clone(), json!(5)), Some(FailureCode::InvalidBit));
    assert_eq!(verdict(Dialect::Mysql, bit, json!(5)), None);
}

// =============================================================================
// Integer Boundary Tests
// =============================================================================

/// min and max pass, min-1 and max+1 fail with INVALID_RANGE.
#[test]
fn test_integer_boundaries_all_widths() {
    let cases: &[(Dialect, &str, i128, i128)] = &[
        (Dialect::Generic, "smallint", -32768, 32767),
        (Dialect::Generic, "int", -2147483648, 2147483647),
        (Dialect::Generic, "integer", -2147483648, 2147483647),
        (Dialect::Generic, "bigint", i64::MIN as i128, i64::MAX as i128),
        (Dialect::Mysql, "tinyint", -128, 127),
        (Dialect::Mysql, "mediumint", -8388608, 8388607),
        (Dialect::Mysql, "tinyint unsigned", 0, 255),
        (Dialect::Mysql, "smallint unsigned", 0, 65535),
        (Dialect::Mysql, "mediumint unsigned", 0, 16777215),
        (Dialect::Mysql, "int unsigned", 0, 4294967295),
        (Dialect::Mysql, "bigint unsigned", 0, u64::MAX as i128),
        (Dialect::Pgsql, "int2", -32768, 32767),
        (Dialect::Pgsql, "int4", -2147483648, 2147483647),
        (Dialect::Pgsql, "int8", i64::MIN as i128, i64::MAX as i128),
        (Dialect::Sqlsrv, "tinyint", -128, 127),
    ];

    for &(dialect, type_name, min, max) in cases {
        let column = ColumnInfo::new("n", type_name);
        let text = |n: i128| json!(n.to_string());

        assert_eq!(verdict(dialect, column.clone(), text(min)), None, "{type_name} min");
        assert_eq!(verdict(dialect, column.clone(), text(max)), None, "{type_name} max");
        assert_eq!(
            verdict(dialect, column.clone(), text(min - 1)),
            Some(FailureCode::InvalidRange),
            "{type_name} min-1"
        );
        assert_eq!(
            verdict(dialect, column, text(max + 1)),
            Some(FailureCode::InvalidRange),
            "{type_name} max+1"
        );
    }
}

#[test]
fn test_integer_failure_order() {
    let column = ColumnInfo::new("n", "smallint");
    assert_eq!(
        verdict(Dialect::Generic, column.clone(), json!("ten")),
        Some(FailureCode::InvalidNumber)
    );
    // fractional beats out-of-range
    assert_eq!(
        verdict(Dialect::Generic, column.clone(), json!("99999.5")),
        Some(FailureCode::InvalidInteger)
    );
    assert_eq!(verdict(Dialect::Generic, column, json!(1.0)), None);
}

// =============================================================================
// Fixed Point Tests
// =============================================================================

#[test]
fn test_fixed_point_precision_and_scale() {
    let column = ColumnInfo::new("price", "decimal").size(5).scale(2);
    assert_eq!(verdict(Dialect::Generic, column.clone(), json!("123.45")), None);
    assert_eq!(
        verdict(Dialect::Generic, column.clone(), json!("1234.56")),
        Some(FailureCode::InvalidPrecision)
    );
    assert_eq!(
        verdict(Dialect::Generic, column, json!("12.345")),
        Some(FailureCode::InvalidScale)
    );

    for alias in ["numeric", "dec", "fixed"] {
        let column = ColumnInfo::new("price", alias).size(5).scale(2);
        assert_eq!(
            verdict(Dialect::Mysql, column, json!("1234.56")),
            Some(FailureCode::InvalidPrecision),
            "{alias}"
        );
    }
}

// =============================================================================
// Length Tests
// =============================================================================

/// Three 4-byte characters: 12 bytes, 3 characters.
#[test]
fn test_byte_and_char_length_diverge() {
    let value = json!("\u{1F980}\u{1F980}\u{1F980}");

    let national = ColumnInfo::new("s", "nvarchar").size(3);
    assert_eq!(verdict(Dialect::Generic, national, value.clone()), None);

    let bytes = ColumnInfo::new("s", "varchar").size(3);
    assert_eq!(
        verdict(Dialect::Generic, bytes, value.clone()),
        Some(FailureCode::InvalidLength)
    );

    let wide = ColumnInfo::new("s", "varchar").size(12);
    assert_eq!(verdict(Dialect::Generic, wide, value), None);
}

// =============================================================================
// Temporal Tests
// =============================================================================

#[test]
fn test_leap_years() {
    let column = ColumnInfo::new("d", "date");
    assert_eq!(
        verdict(Dialect::Generic, column.clone(), json!("2021-02-29")),
        Some(FailureCode::InvalidDate)
    );
    assert_eq!(verdict(Dialect::Generic, column.clone(), json!("2020-02-29")), None);
    assert_eq!(
        verdict(Dialect::Generic, column.clone(), json!("1900-02-29")),
        Some(FailureCode::InvalidDate)
    );
    assert_eq!(verdict(Dialect::Generic, column, json!("2000-02-29")), None);
}

#[test]
fn test_time_fsp_and_range() {
    let two = ColumnInfo::new("t", "time").size(2);
    assert_eq!(
        verdict(Dialect::Generic, two, json!("23:59:59.1234")),
        Some(FailureCode::InvalidFsp)
    );

    let zero = ColumnInfo::new("t", "time").size(0);
    assert_eq!(
        verdict(Dialect::Generic, zero, json!("24:00:00")),
        Some(FailureCode::InvalidTime)
    );
}

#[test]
fn test_datetime_separator() {
    for (dialect, type_name) in [
        (Dialect::Mysql, "datetime"),
        (Dialect::Pgsql, "timestamp"),
        (Dialect::Sqlsrv, "datetime2"),
        (Dialect::Sqlsrv, "datetime"),
    ] {
        let column = ColumnInfo::new("at", type_name);
        assert_eq!(
            verdict(dialect, column.clone(), json!("2020-01-01X10:00:00")),
            Some(FailureCode::InvalidSeparator),
            "{dialect} {type_name}"
        );
        assert_eq!(verdict(dialect, column.clone(), json!("2020-01-01 10:00:00")), None);
        assert_eq!(verdict(dialect, column, json!("2020-01-01T10:00:00")), None);
    }
}

// =============================================================================
// Dialect Divergence Tests
// =============================================================================

/// MySQL dates start at 1000-01-01; SQL Server datetime at 1753-01-01.
#[test]
fn test_lower_bounds_not_cross_applied() {
    let mysql_date = ColumnInfo::new("d", "date");
    assert_eq!(verdict(Dialect::Mysql, mysql_date.clone(), json!("1753-01-01")), None);
    assert_eq!(verdict(Dialect::Mysql, mysql_date.clone(), json!("1500-06-15")), None);
    assert_eq!(
        verdict(Dialect::Mysql, mysql_date, json!("0999-12-31")),
        Some(FailureCode::InvalidDate)
    );

    // SQL Server's plain date has no 1753 floor
    let sqlsrv_date = ColumnInfo::new("d", "date");
    assert_eq!(verdict(Dialect::Sqlsrv, sqlsrv_date, json!("1500-06-15")), None);

    let legacy = ColumnInfo::new("at", "datetime");
    assert_eq!(verdict(Dialect::Sqlsrv, legacy.clone(), json!("1753-01-01 00:00:00")), None);
    assert_eq!(
        verdict(Dialect::Sqlsrv, legacy.clone(), json!("1500-06-15 00:00:00")),
        Some(FailureCode::InvalidDate)
    );

    // MySQL datetime has no 1753 floor either
    assert_eq!(verdict(Dialect::Mysql, legacy, json!("1500-06-15 00:00:00")), None);
}

/// SQL Server tinyint is checked as signed unless configured otherwise.
#[test]
fn test_sqlsrv_tinyint_discrepancy_is_preserved() {
    let column = ColumnInfo::new("n", "tinyint");
    assert_eq!(
        verdict(Dialect::Sqlsrv, column.clone(), json!(255)),
        Some(FailureCode::InvalidRange)
    );
    assert_eq!(verdict(Dialect::Sqlsrv, column, json!(-128)), None);
}

#[test]
fn test_boolean_vocabularies_differ() {
    let column = ColumnInfo::new("flag", "boolean");
    assert_eq!(verdict(Dialect::Pgsql, column.clone(), json!("yes")), None);
    assert_eq!(
        verdict(Dialect::Mysql, column.clone(), json!("yes")),
        Some(FailureCode::InvalidBoolean)
    );
    assert_eq!(verdict(Dialect::Generic, column, json!("yes")), None);
}

// =============================================================================
// Engine Tests
// =============================================================================

#[test]
fn test_stops_at_first_failure_in_row_order() {
    let columns = index_columns(vec![
        ColumnInfo::new("a", "int"),
        ColumnInfo::new("b", "date"),
        ColumnInfo::new("c", "varchar").size(1),
    ]);
    let data = row(json!({ "c": "too long", "a": "x", "b": "nope" }));

    let err = Validator::for_dialect(Dialect::Generic)
        .assert(&data, &columns)
        .unwrap_err();
    assert_eq!(
        err,
        FilterError::Invalid(ValidationFailure::new(FailureCode::InvalidLength, "c"))
    );

    let all = Validator::for_dialect(Dialect::Generic)
        .collect_failures(&data, &columns)
        .unwrap();
    let codes: Vec<_> = all.iter().map(|f| (f.column.as_str(), f.code)).collect();
    assert_eq!(
        codes,
        vec![
            ("c", FailureCode::InvalidLength),
            ("a", FailureCode::InvalidNumber),
            ("b", FailureCode::InvalidDate),
        ]
    );
}

#[test]
fn test_missing_metadata_is_contract_violation() {
    let columns = single(ColumnInfo::new("a", "int"));
    let data = row(json!({ "a": 1, "b": 2 }));

    let err = Validator::for_dialect(Dialect::Generic)
        .assert(&data, &columns)
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(err.failure().is_none());
}

#[test]
fn test_values_are_not_mutated() {
    let columns = single(ColumnInfo::new("n", "int"));
    let data = row(json!({ "n": " 42 " }));
    let before = data.clone();

    Validator::for_dialect(Dialect::Generic)
        .assert(&data, &columns)
        .unwrap();
    assert_eq!(data, before);
}

/// Same input, same verdict, every time.
#[test]
fn test_validation_is_deterministic() {
    let columns = single(ColumnInfo::new("n", "smallint"));
    let data = row(json!({ "n": 40000 }));
    let validator = Validator::for_dialect(Dialect::Pgsql);

    let first = validator.assert(&data, &columns).unwrap_err();
    for _ in 0..100 {
        assert_eq!(validator.assert(&data, &columns).unwrap_err(), first);
    }
}

/// One rule set, many threads, no locking.
#[test]
fn test_shared_rule_set_across_threads() {
    let rules: &'static RuleSet = RuleSet::shared(Dialect::Mysql);
    let columns = single(ColumnInfo::new("n", "tinyint unsigned"));

    std::thread::scope(|scope| {
        for i in 0..8_i64 {
            let columns = &columns;
            scope.spawn(move || {
                let validator = Validator::new(rules);
                let ok = row(json!({ "n": i }));
                let bad = row(json!({ "n": 256 + i }));
                assert!(validator.assert(&ok, columns).is_ok());
                assert!(validator.assert(&bad, columns).is_err());
            });
        }
    });
}
