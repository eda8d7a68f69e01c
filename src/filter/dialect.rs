//! SQL dialects and their rule overlays
//!
//! Each dialect is the base rule set plus a table of additions and
//! overrides. Overlays are plain data; there is no per-dialect code path
//! in the engine.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::errors::FailureCode;
use super::primitives::Literal;
use super::rules::{
    Limit, Precision, Rule, RuleSet, INT1, INT1_RANGE, INT2, INT2_RANGE, INT3, INT3_RANGE, INT4,
    INT4_RANGE, INT8, INT8_RANGE,
};

const MYSQL_BOOLEAN: &[Literal] = &[
    Literal::Int(0),
    Literal::Int(1),
    Literal::Str("0"),
    Literal::Str("1"),
    Literal::Bool(true),
    Literal::Bool(false),
];

const PGSQL_BOOLEAN: &[Literal] = &[
    Literal::Bool(true),
    Literal::Bool(false),
    Literal::Int(0),
    Literal::Int(1),
    Literal::Str("0"),
    Literal::Str("1"),
    Literal::Str("t"),
    Literal::Str("f"),
    Literal::Str("true"),
    Literal::Str("false"),
    Literal::Str("y"),
    Literal::Str("n"),
    Literal::Str("yes"),
    Literal::Str("no"),
];

const SQLSRV_BIT: &[Literal] = &[
    Literal::Int(0),
    Literal::Int(1),
    Literal::Bool(true),
    Literal::Bool(false),
];

/// Supported SQL backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Base rules only
    #[default]
    Generic,
    Mysql,
    Pgsql,
    Sqlsrv,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Generic,
        Dialect::Mysql,
        Dialect::Pgsql,
        Dialect::Sqlsrv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Mysql => "mysql",
            Dialect::Pgsql => "pgsql",
            Dialect::Sqlsrv => "sqlsrv",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown dialect '{0}' (expected generic, mysql, pgsql, or sqlsrv)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "base" => Ok(Dialect::Generic),
            "mysql" | "mariadb" => Ok(Dialect::Mysql),
            "pgsql" | "postgres" | "postgresql" => Ok(Dialect::Pgsql),
            "sqlsrv" | "mssql" | "sqlserver" => Ok(Dialect::Sqlsrv),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

/// Knobs for behavior that differs from what the backend itself does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DialectOptions {
    /// Check SQL Server `tinyint` as unsigned 0..=255, which is what the
    /// server stores. Off by default: the check stays signed -128..=127.
    #[serde(default)]
    pub sqlsrv_tinyint_unsigned: bool,
}

static SHARED: Lazy<[RuleSet; 4]> = Lazy::new(|| {
    Dialect::ALL.map(|dialect| RuleSet::for_dialect(dialect, DialectOptions::default()))
});

impl RuleSet {
    /// Build the rules for a dialect.
    pub fn for_dialect(dialect: Dialect, options: DialectOptions) -> Self {
        let mut set = RuleSet::base();
        match dialect {
            Dialect::Generic => {}
            Dialect::Mysql => apply_mysql(&mut set),
            Dialect::Pgsql => apply_pgsql(&mut set),
            Dialect::Sqlsrv => apply_sqlsrv(&mut set, options),
        }
        set
    }

    /// Process-wide rules for a dialect with default options.
    pub fn shared(dialect: Dialect) -> &'static RuleSet {
        let index = match dialect {
            Dialect::Generic => 0,
            Dialect::Mysql => 1,
            Dialect::Pgsql => 2,
            Dialect::Sqlsrv => 3,
        };
        &SHARED[index]
    }
}

fn apply_mysql(set: &mut RuleSet) {
    let boolean = Rule::Literals {
        allowed: MYSQL_BOOLEAN,
        code: FailureCode::InvalidBoolean,
    };
    set.insert("boolean", boolean.clone());
    set.insert("bool", boolean);

    set.insert("tinyint", Rule::integer(INT1_RANGE));
    set.insert("tinyint unsigned", Rule::unsigned(INT1));
    set.insert("smallint unsigned", Rule::unsigned(INT2));
    set.insert("mediumint", Rule::integer(INT3_RANGE));
    set.insert("mediumint unsigned", Rule::unsigned(INT3));
    set.insert("int unsigned", Rule::unsigned(INT4));
    set.insert("integer unsigned", Rule::unsigned(INT4));
    set.insert("bigint unsigned", Rule::unsigned(INT8));

    set.insert("dec", Rule::FixedPoint);
    set.insert("fixed", Rule::FixedPoint);

    set.insert("binary", Rule::ByteLength(Limit::Column));
    set.insert("varbinary", Rule::ByteLength(Limit::Column));

    for (text, blob, max) in [
        ("tinytext", "tinyblob", INT1),
        ("text", "blob", INT2),
        ("mediumtext", "mediumblob", INT3),
        ("longtext", "longblob", INT4),
    ] {
        let limit = Limit::Fixed(max as u64);
        set.insert(text, Rule::ByteLength(limit));
        set.insert(blob, Rule::ByteLength(limit));
    }

    set.insert("date", Rule::Date { min: Some("1000-01-01") });
    set.insert("datetime", Rule::DateTime(Precision::Column));
    set.insert("timestamp", Rule::UnixTime { max: INT4 });
    set.insert("year", Rule::Year { min: 1901, max: 2155 });
}

fn apply_pgsql(set: &mut RuleSet) {
    set.insert("int2", Rule::integer(INT2_RANGE));
    set.insert("int4", Rule::integer(INT4_RANGE));
    set.insert("int8", Rule::integer(INT8_RANGE));

    set.insert("float4", Rule::FloatingPoint);
    set.insert("float8", Rule::FloatingPoint);

    set.insert("timestamp", Rule::DateTime(Precision::Column));
    set.insert("timestamp without time zone", Rule::DateTime(Precision::Column));
    set.insert("time without time zone", Rule::Time(Precision::Column));

    let boolean = Rule::Literals {
        allowed: PGSQL_BOOLEAN,
        code: FailureCode::InvalidBoolean,
    };
    set.insert("boolean", boolean.clone());
    set.insert("bool", boolean);
}

fn apply_sqlsrv(set: &mut RuleSet, options: DialectOptions) {
    let bit = Rule::Literals {
        allowed: SQLSRV_BIT,
        code: FailureCode::InvalidBit,
    };
    set.insert("bit", bit);

    let tinyint = if options.sqlsrv_tinyint_unsigned {
        Rule::unsigned(INT1)
    } else {
        Rule::integer(INT1_RANGE)
    };
    set.insert("tinyint", tinyint);

    set.insert("char varying", Rule::ByteLength(Limit::Column));
    set.insert("binary", Rule::ByteLength(Limit::Column));
    set.insert("varbinary", Rule::ByteLength(Limit::Column));
    set.insert("text", Rule::ByteLength(Limit::Fixed((INT4_RANGE.1 - 1) as u64)));

    set.insert("datetime", Rule::LegacyDateTime { min: "1753-01-01" });
    set.insert("datetime2", Rule::DateTime(Precision::Column));
}
