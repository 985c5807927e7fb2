//! Cleaning pipeline for uploaded tables.
//!
//! - **missing**: missing-value policies (remove rows, fill zero, fill mean)
//! - **dedupe**: exact duplicate row removal
//! - **projection**: column selection
//! - **numeric**: numeric column detection
//! - **pipeline**: the fixed missing → dedupe → projection sequence
//! - **session**: per-upload state for repeated cleaning runs

pub mod dedupe;
pub mod missing;
pub mod numeric;
pub mod pipeline;
pub mod projection;
pub mod session;

pub use dedupe::{DedupeOutcome, drop_duplicate_rows};
pub use missing::{MissingOutcome, apply_missing_policy, column_mean};
pub use numeric::{has_numeric_columns, numeric_columns};
pub use pipeline::{CleaningOutcome, CleaningReport, run_pipeline};
pub use projection::{project_columns, validate_selection};
pub use session::Session;
