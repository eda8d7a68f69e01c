//! sqlfilter - a last-line SQL data type filter
//!
//! Given a row bound for a table and the table's column metadata, decide
//! whether the backend will store every value faithfully or silently
//! coerce, truncate, or reject it, and fail before the write is issued.

pub mod cli;
pub mod config;
pub mod filter;
