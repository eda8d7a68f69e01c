//! Filter configuration
//!
//! A JSON file naming the dialect and any behavior switches:
//!
//! ```json
//! { "dialect": "sqlsrv", "sqlsrv_tinyint_unsigned": true }
//! ```
//!
//! Every field is optional; an empty object selects the generic rules.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::{Dialect, DialectOptions, RuleSet};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Which rules to validate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Target backend (default: generic)
    #[serde(default)]
    pub dialect: Dialect,

    /// See `DialectOptions::sqlsrv_tinyint_unsigned` (default: false)
    #[serde(default)]
    pub sqlsrv_tinyint_unsigned: bool,
}

impl FilterConfig {
    /// Config for a dialect with default options.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn options(&self) -> DialectOptions {
        DialectOptions {
            sqlsrv_tinyint_unsigned: self.sqlsrv_tinyint_unsigned,
        }
    }

    /// Build the configured rule set.
    pub fn rule_set(&self) -> RuleSet {
        RuleSet::for_dialect(self.dialect, self.options())
    }
}
