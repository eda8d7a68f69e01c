//! Column metadata and row definitions
//!
//! Column metadata comes from schema introspection and is read-only here.
//! A row is the name/value mapping for one prospective insert or update;
//! only the columns present in that write are checked.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One prospective write, in column order.
pub type Row = Map<String, Value>;

/// Column metadata for a table, keyed by column name.
pub type Columns = HashMap<String, ColumnInfo>;

/// Declared shape of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name, unique within its table
    pub name: String,
    /// Declared SQL type, e.g. "int unsigned" or "character varying"
    #[serde(rename = "type")]
    pub type_name: String,
    /// Length, precision, or fractional-seconds precision depending on type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Digits after the decimal point (fixed-point types only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u64>,
    /// Whether null is disallowed
    #[serde(default)]
    pub notnull: bool,
    /// Whether the server assigns the value
    #[serde(default)]
    pub autoinc: bool,
}

impl ColumnInfo {
    /// Create a nullable column of the given type with no size
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            size: None,
            scale: None,
            notnull: false,
            autoinc: false,
        }
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn scale(mut self, scale: u64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.notnull = true;
        self
    }

    pub fn autoinc(mut self) -> Self {
        self.autoinc = true;
        self
    }

    /// Fractional-seconds precision for temporal types (0 when unset)
    pub fn fsp(&self) -> u32 {
        self.size
            .map(|size| u32::try_from(size).unwrap_or(u32::MAX))
            .unwrap_or(0)
    }

    /// Declared type in dispatch form
    pub fn normalized_type(&self) -> String {
        normalize_type_name(&self.type_name)
    }
}

/// Index column metadata by name.
pub fn index_columns(columns: impl IntoIterator<Item = ColumnInfo>) -> Columns {
    columns
        .into_iter()
        .map(|column| (column.name.clone(), column))
        .collect()
}

/// Strip all whitespace and lowercase, so "Double Precision" and
/// "doubleprecision" dispatch to the same rule.
pub fn normalize_type_name(type_name: &str) -> String {
    type_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
