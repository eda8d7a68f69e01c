//! Exact decimal view of numeric input
//!
//! Numeric text is optional surrounding whitespace, an optional sign,
//! digits with an optional decimal point, and an optional exponent.
//! Parsing never goes through floating point, so range and digit checks
//! are exact even at the 8-byte boundaries.

use std::cmp::Ordering;

use serde_json::{Number, Value};

/// How far the decimal point may move past the written digits. Wider than
/// any SQL precision or scale, so clamping the shifted point keeps the
/// expanded digit strings bounded without changing a verdict.
const MAX_SHIFT: i64 = 4096;

/// A numeric value as sign, integer digits, and fraction digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numeric {
    negative: bool,
    /// Integer digits with leading zeros removed ("" for zero)
    integer: String,
    /// Fraction digits as written, after any exponent shift
    fraction: String,
}

impl Numeric {
    /// Parse numeric text, returning None for anything that is not a number.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim_matches(is_numeric_space);
        let mut chars = text.chars().peekable();

        let mut negative = false;
        if let Some(&sign) = chars.peek() {
            if sign == '+' || sign == '-' {
                negative = sign == '-';
                chars.next();
            }
        }

        let mut int_part = String::new();
        while let Some(&c) = chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            int_part.push(c);
            chars.next();
        }

        let mut frac_part = String::new();
        if chars.peek() == Some(&'.') {
            chars.next();
            while let Some(&c) = chars.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                frac_part.push(c);
                chars.next();
            }
        }

        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }

        let mut exponent: i64 = 0;
        if matches!(chars.peek(), Some('e') | Some('E')) {
            chars.next();
            let mut exp_negative = false;
            if let Some(&sign) = chars.peek() {
                if sign == '+' || sign == '-' {
                    exp_negative = sign == '-';
                    chars.next();
                }
            }

            let mut seen = false;
            while let Some(&c) = chars.peek() {
                let Some(digit) = c.to_digit(10) else {
                    break;
                };
                seen = true;
                exponent = exponent.saturating_mul(10).saturating_add(i64::from(digit));
                chars.next();
            }
            if !seen {
                return None;
            }
            if exp_negative {
                exponent = -exponent;
            }
        }

        if chars.next().is_some() {
            return None;
        }

        Some(Self::shift(negative, int_part, frac_part, exponent))
    }

    /// Numeric view of a JSON value. Only numbers and numeric strings qualify.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Self::parse(&number_text(n)),
            Value::String(s) => Self::parse(s),
            _ => None,
        }
    }

    fn shift(negative: bool, int_part: String, frac_part: String, exponent: i64) -> Self {
        let (integer, fraction) = if exponent == 0 {
            (int_part, frac_part)
        } else {
            let digits = format!("{}{}", int_part, frac_part);
            let point = (int_part.len() as i64)
                .saturating_add(exponent)
                .clamp(-MAX_SHIFT, digits.len() as i64 + MAX_SHIFT);
            if point <= 0 {
                let zeros = "0".repeat(point.unsigned_abs() as usize);
                (String::new(), format!("{}{}", zeros, digits))
            } else if point as usize >= digits.len() {
                let zeros = "0".repeat(point as usize - digits.len());
                (format!("{}{}", digits, zeros), String::new())
            } else {
                let (i, f) = digits.split_at(point as usize);
                (i.to_string(), f.to_string())
            }
        };

        Self {
            negative,
            integer: integer.trim_start_matches('0').to_string(),
            fraction,
        }
    }

    /// True when the fractional part is zero, i.e. truncation is lossless.
    pub fn is_integral(&self) -> bool {
        self.fraction.bytes().all(|b| b == b'0')
    }

    /// Digits stored, excluding sign, separator, and leading integer zeros.
    pub fn digit_count(&self) -> usize {
        self.integer.len() + self.fraction.len()
    }

    /// Digits after the decimal separator.
    pub fn fraction_digits(&self) -> usize {
        self.fraction.len()
    }

    /// Compare the exact value against an integer bound.
    pub fn cmp_integer(&self, bound: i128) -> Ordering {
        let has_fraction = !self.is_integral();

        // 38 digits always fit in an i128
        if self.integer.len() > 38 {
            return if self.negative {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        let magnitude: i128 = if self.integer.is_empty() {
            0
        } else {
            match self.integer.parse() {
                Ok(m) => m,
                Err(_) => return Ordering::Greater,
            }
        };

        if self.negative {
            match (-magnitude).cmp(&bound) {
                Ordering::Equal if has_fraction => Ordering::Less,
                ordering => ordering,
            }
        } else {
            match magnitude.cmp(&bound) {
                Ordering::Equal if has_fraction => Ordering::Greater,
                ordering => ordering,
            }
        }
    }

    /// Whether the value lies in `[min, max]`.
    pub fn within(&self, min: i128, max: i128) -> bool {
        self.cmp_integer(min) != Ordering::Less && self.cmp_integer(max) != Ordering::Greater
    }
}

/// Text a driver binds for a JSON number.
///
/// Whole floats drop their ".0", so `12.0` binds as "12" like the integer.
pub fn number_text(n: &Number) -> String {
    let text = n.to_string();
    match text.strip_suffix(".0") {
        Some(whole) if n.is_f64() => whole.to_string(),
        _ => text,
    }
}

fn is_numeric_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

/// Whether a value is a number or numeric text.
pub fn is_numeric(value: &Value) -> bool {
    Numeric::from_value(value).is_some()
}
