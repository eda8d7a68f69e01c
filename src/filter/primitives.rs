//! Dialect-independent validators
//!
//! Each validator returns `None` when the value will be stored faithfully,
//! or the failure code describing what the backend would do to it.

use std::borrow::Cow;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::errors::FailureCode;
use super::numeric::{number_text, Numeric};

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("date pattern"));

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-1][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9](?:\.([0-9]+))?$")
        .expect("time pattern")
});

/// A scalar literal accepted by a boolean-like column.
///
/// Matching is by identity: the JSON kind and the value must both agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Str(&'static str),
}

impl Literal {
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::Bool(expected), Value::Bool(actual)) => expected == actual,
            (Literal::Int(expected), Value::Number(actual)) => {
                // 1.0 is a float, not the integer 1
                !actual.is_f64() && actual.as_i64() == Some(*expected)
            }
            (Literal::Str(expected), Value::String(actual)) => expected == actual,
            _ => false,
        }
    }
}

/// Text a driver would bind for the value. Null and containers have none.
pub fn text_of(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(number_text(n))),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "1" } else { "0" })),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integer column check: numeric, no fractional part, inside `[min, max]`.
pub fn integer_in_range(value: &Value, min: i128, max: i128) -> Option<FailureCode> {
    let Some(number) = Numeric::from_value(value) else {
        return Some(FailureCode::InvalidNumber);
    };

    if !number.is_integral() {
        return Some(FailureCode::InvalidInteger);
    }

    if !number.within(min, max) {
        return Some(FailureCode::InvalidRange);
    }

    None
}

/// Fixed-point check against declared precision and scale.
///
/// A missing precision or scale skips that check.
pub fn fixed_point(
    value: &Value,
    precision: Option<u64>,
    scale: Option<u64>,
) -> Option<FailureCode> {
    let Some(number) = Numeric::from_value(value) else {
        return Some(FailureCode::InvalidNumber);
    };

    if let Some(precision) = precision {
        if number.digit_count() as u64 > precision {
            return Some(FailureCode::InvalidPrecision);
        }
    }

    if let Some(scale) = scale {
        if number.fraction_digits() as u64 > scale {
            return Some(FailureCode::InvalidScale);
        }
    }

    None
}

/// Floating-point check: any number passes.
pub fn floating_point(value: &Value) -> Option<FailureCode> {
    match Numeric::from_value(value) {
        Some(_) => None,
        None => Some(FailureCode::InvalidNumber),
    }
}

/// Byte-length check for byte-oriented string and binary types.
pub fn byte_length(value: &Value, max_bytes: u64) -> Option<FailureCode> {
    match text_of(value) {
        Some(text) if text.len() as u64 <= max_bytes => None,
        _ => Some(FailureCode::InvalidLength),
    }
}

/// Character-length check for national (multi-byte aware) types.
pub fn char_length(value: &Value, max_chars: u64) -> Option<FailureCode> {
    match text_of(value) {
        Some(text) if text.chars().count() as u64 <= max_chars => None,
        _ => Some(FailureCode::InvalidLength),
    }
}

/// `YYYY-MM-DD` naming a real calendar day.
pub fn date(value: &Value) -> Option<FailureCode> {
    match text_of(value) {
        Some(text) if is_calendar_date(&text) => None,
        _ => Some(FailureCode::InvalidDate),
    }
}

fn is_calendar_date(text: &str) -> bool {
    let Some(caps) = DATE_PATTERN.captures(text) else {
        return false;
    };

    let (Ok(year), Ok(month), Ok(day)) = (
        caps[1].parse::<i32>(),
        caps[2].parse::<u32>(),
        caps[3].parse::<u32>(),
    ) else {
        return false;
    };

    // year 0000 is not a calendar year
    year >= 1 && NaiveDate::from_ymd_opt(year, month, day).is_some()
}

/// `HH:MM:SS[.fraction]` with at most `fsp` fractional digits.
pub fn time(value: &Value, fsp: u32) -> Option<FailureCode> {
    match text_of(value) {
        Some(text) => time_text(&text, fsp),
        None => Some(FailureCode::InvalidTime),
    }
}

fn time_text(text: &str, fsp: u32) -> Option<FailureCode> {
    let Some(caps) = TIME_PATTERN.captures(text) else {
        return Some(FailureCode::InvalidTime);
    };

    match caps.get(1) {
        Some(fraction) if fraction.as_str().len() as u64 > u64::from(fsp) => {
            Some(FailureCode::InvalidFsp)
        }
        _ => None,
    }
}

/// Date, a space or `T`, then a time with at most `fsp` fractional digits.
pub fn date_time(value: &Value, fsp: u32) -> Option<FailureCode> {
    match text_of(value) {
        Some(text) => date_time_text(&text, fsp),
        None => Some(FailureCode::InvalidSeparator),
    }
}

pub(crate) fn date_time_text(text: &str, fsp: u32) -> Option<FailureCode> {
    let (Some(date_part), Some(separator), Some(time_part)) =
        (text.get(..10), text.get(10..11), text.get(11..))
    else {
        return Some(FailureCode::InvalidSeparator);
    };

    if separator != " " && separator != "T" {
        return Some(FailureCode::InvalidSeparator);
    }

    if !is_calendar_date(date_part) {
        return Some(FailureCode::InvalidDate);
    }

    time_text(time_part, fsp)
}

/// Membership in a dialect's accepted literal set.
pub fn boolean_literal(value: &Value, allowed: &[Literal]) -> Option<FailureCode> {
    if allowed.iter().any(|literal| literal.matches(value)) {
        None
    } else {
        Some(FailureCode::InvalidBoolean)
    }
}
