//! Type-name rule tables
//!
//! A `RuleSet` maps normalized SQL type names to the check that guards
//! them. It is built once, never written afterwards, and may be shared
//! freely across threads. A type with no entry is not validated.

use std::collections::HashMap;

use serde_json::Value;

use super::errors::FailureCode;
use super::numeric::Numeric;
use super::primitives::{self, Literal};
use super::types::{normalize_type_name, ColumnInfo};

pub const INT1: i128 = 255;
pub const INT1_RANGE: (i128, i128) = (-128, 127);

pub const INT2: i128 = 65535;
pub const INT2_RANGE: (i128, i128) = (-32768, 32767);

pub const INT3: i128 = 16777215;
pub const INT3_RANGE: (i128, i128) = (-8388608, 8388607);

pub const INT4: i128 = 4294967295;
pub const INT4_RANGE: (i128, i128) = (-2147483648, 2147483647);

pub const INT8: i128 = 18446744073709551615;
pub const INT8_RANGE: (i128, i128) = (-9223372036854775808, 9223372036854775807);

/// Where a length limit comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// The column's declared size; unchecked when the size is unknown
    Column,
    Fixed(u64),
}

/// Where a fractional-seconds precision comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// The column's declared size, 0 when unknown
    Column,
    Fixed(u32),
}

/// The check registered for one type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Integer { min: i128, max: i128 },
    /// Precision and scale from the column
    FixedPoint,
    FloatingPoint,
    ByteLength(Limit),
    CharLength(Limit),
    /// Calendar date, optionally no earlier than `min` (`YYYY-MM-DD`)
    Date { min: Option<&'static str> },
    Time(Precision),
    DateTime(Precision),
    /// Literal membership, failing with `code`
    Literals {
        allowed: &'static [Literal],
        code: FailureCode,
    },
    /// Unix seconds in `[0, max]` with at most column-fsp fractional digits
    UnixTime { max: i128 },
    /// 4-digit year in `[min, max]`, or the zero year "0000"
    Year { min: i128, max: i128 },
    /// Fixed 3-digit fsp, rounded to .xx0/.xx3/.xx7, no earlier than `min`
    LegacyDateTime { min: &'static str },
}

impl Rule {
    pub fn integer((min, max): (i128, i128)) -> Self {
        Rule::Integer { min, max }
    }

    pub fn unsigned(max: i128) -> Self {
        Rule::Integer { min: 0, max }
    }

    /// Run the check for a non-null value.
    pub fn check(&self, value: &Value, column: &ColumnInfo) -> Option<FailureCode> {
        match self {
            Rule::Integer { min, max } => primitives::integer_in_range(value, *min, *max),
            Rule::FixedPoint => {
                // an undeclared scale is 0 once a precision is declared
                let scale = column.scale.or(column.size.map(|_| 0));
                primitives::fixed_point(value, column.size, scale)
            }
            Rule::FloatingPoint => primitives::floating_point(value),
            Rule::ByteLength(limit) => match resolve_limit(*limit, column) {
                Some(max) => primitives::byte_length(value, max),
                None => None,
            },
            Rule::CharLength(limit) => match resolve_limit(*limit, column) {
                Some(max) => primitives::char_length(value, max),
                None => None,
            },
            Rule::Date { min } => check_date(value, *min),
            Rule::Time(precision) => primitives::time(value, resolve_fsp(*precision, column)),
            Rule::DateTime(precision) => {
                primitives::date_time(value, resolve_fsp(*precision, column))
            }
            Rule::Literals { allowed, code } => {
                primitives::boolean_literal(value, allowed).map(|_| *code)
            }
            Rule::UnixTime { max } => check_unix_time(value, column.fsp(), *max),
            Rule::Year { min, max } => check_year(value, *min, *max),
            Rule::LegacyDateTime { min } => check_legacy_date_time(value, min),
        }
    }
}

fn resolve_limit(limit: Limit, column: &ColumnInfo) -> Option<u64> {
    match limit {
        Limit::Column => column.size,
        Limit::Fixed(max) => Some(max),
    }
}

fn resolve_fsp(precision: Precision, column: &ColumnInfo) -> u32 {
    match precision {
        Precision::Column => column.fsp(),
        Precision::Fixed(fsp) => fsp,
    }
}

fn check_date(value: &Value, min: Option<&str>) -> Option<FailureCode> {
    if let Some(failure) = primitives::date(value) {
        return Some(failure);
    }

    match (min, value.as_str()) {
        // same fixed-width format, so text order is date order
        (Some(min), Some(text)) if text < min => Some(FailureCode::InvalidDate),
        _ => None,
    }
}

fn check_unix_time(value: &Value, fsp: u32, max: i128) -> Option<FailureCode> {
    let Some(number) = Numeric::from_value(value) else {
        return Some(FailureCode::InvalidUnixtime);
    };

    if number.fraction_digits() as u64 > u64::from(fsp) {
        return Some(FailureCode::InvalidFsp);
    }

    if !number.within(0, max) {
        return Some(FailureCode::InvalidUnixtime);
    }

    None
}

fn check_year(value: &Value, min: i128, max: i128) -> Option<FailureCode> {
    if value.as_str() == Some("0000") {
        return None;
    }

    match Numeric::from_value(value) {
        Some(year) if year.is_integral() && year.within(min, max) => None,
        _ => Some(FailureCode::InvalidYear),
    }
}

fn check_legacy_date_time(value: &Value, min: &str) -> Option<FailureCode> {
    let Some(text) = primitives::text_of(value) else {
        return Some(FailureCode::InvalidSeparator);
    };

    if let Some(failure) = primitives::date_time_text(&text, 3) {
        return Some(failure);
    }

    // stored in 1/300 second ticks
    if let Some((_, fraction)) = text[11..].rsplit_once('.') {
        if fraction.len() == 3 && !fraction.ends_with(|c| matches!(c, '0' | '3' | '7')) {
            return Some(FailureCode::InvalidFsp);
        }
    }

    if &*text < min {
        return Some(FailureCode::InvalidDate);
    }

    None
}

/// Immutable map from normalized type name to rule.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: HashMap<String, Rule>,
}

impl RuleSet {
    /// An empty rule set; every type passes unchecked.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The rules shared by every dialect.
    pub fn base() -> Self {
        let mut set = Self::empty();

        set.insert("smallint", Rule::integer(INT2_RANGE));
        set.insert("int", Rule::integer(INT4_RANGE));
        set.insert("integer", Rule::integer(INT4_RANGE));
        set.insert("bigint", Rule::integer(INT8_RANGE));

        set.insert("decimal", Rule::FixedPoint);
        set.insert("numeric", Rule::FixedPoint);

        set.insert("float", Rule::FloatingPoint);
        set.insert("double precision", Rule::FloatingPoint);
        set.insert("real", Rule::FloatingPoint);

        set.insert("char", Rule::ByteLength(Limit::Column));
        set.insert("character", Rule::ByteLength(Limit::Column));
        set.insert("character varying", Rule::ByteLength(Limit::Column));
        set.insert("varchar", Rule::ByteLength(Limit::Column));

        set.insert("nchar", Rule::CharLength(Limit::Column));
        set.insert("national character", Rule::CharLength(Limit::Column));
        set.insert("nvarchar", Rule::CharLength(Limit::Column));
        set.insert("national character varying", Rule::CharLength(Limit::Column));

        set.insert("date", Rule::Date { min: None });
        set.insert("time", Rule::Time(Precision::Column));

        set
    }

    /// Register or replace the rule for a type name.
    pub fn insert(&mut self, type_name: &str, rule: Rule) {
        self.rules.insert(normalize_type_name(type_name), rule);
    }

    /// Look up the rule for a declared type, normalizing the name first.
    pub fn get(&self, type_name: &str) -> Option<&Rule> {
        self.rules.get(&normalize_type_name(type_name))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.get(type_name).is_some()
    }

    /// Registered type names in dispatch form, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
