//! Shared utilities for the data sweeper crates.
//!
//! This crate provides the Polars `AnyValue` conversions used when cells are
//! compared, exported or summarized.

pub mod values;

// Re-export commonly used functions at crate root for convenience
pub use values::{any_to_f64, any_to_string, format_numeric};
