//! Shared utilities for Project Ledger crates.
//!
//! This crate provides the Polars `AnyValue` conversion helpers used when
//! materializing project records out of a loaded DataFrame.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use polars::{any_to_bool, any_to_f64, any_to_string, format_numeric, parse_f64};
