//! Data model for the data sweeper.
//!
//! - **table**: the row-aligned [`Table`] with a [`ColumnKind`] tag per column
//! - **options**: cleaning choices ([`MissingValuePolicy`], [`ColumnSelection`])
//! - **export**: output formats for the cleaned table

pub mod error;
pub mod export;
pub mod options;
pub mod table;

pub use error::{Result, SweepError};
pub use export::ExportFormat;
pub use options::{CleaningOptions, ColumnSelection, MissingValuePolicy};
pub use table::{ColumnKind, Table};
