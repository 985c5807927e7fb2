//! The cleaning pipeline.
//!
//! Steps always run in this order:
//!
//! 1. missing-value policy on the raw table
//! 2. duplicate removal, when enabled, on the imputed table
//! 3. column projection, with the selection resolved against the raw columns
//!
//! Deduplicating after imputation lets filled rows collapse into duplicates,
//! and projecting last keeps the column choice out of the earlier steps.

use serde::Serialize;
use tracing::{debug, debug_span};

use sweep_model::{CleaningOptions, MissingValuePolicy, Result, Table};

use crate::dedupe::drop_duplicate_rows;
use crate::missing::apply_missing_policy;
use crate::projection::{project_columns, validate_selection};

/// Counters describing one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub policy: MissingValuePolicy,
    pub remove_duplicates: bool,
    pub rows_in: usize,
    pub rows_out: usize,
    pub columns_in: usize,
    pub columns_out: usize,
    pub rows_with_missing_removed: usize,
    pub cells_filled: usize,
    pub duplicates_removed: usize,
    /// Numeric columns left with missing cells because they had no values to average.
    pub unfilled_columns: Vec<String>,
}

/// Cleaned table plus the report of how it was produced.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub table: Table,
    pub report: CleaningReport,
}

/// Run the cleaning steps against `raw` and return a new table.
pub fn run_pipeline(raw: &Table, options: &CleaningOptions) -> Result<CleaningOutcome> {
    let selection = options.columns.resolve(&raw.column_names());
    validate_selection(raw, &selection)?;

    let missing = debug_span!("missing_values", policy = %options.missing)
        .in_scope(|| apply_missing_policy(raw, options.missing))?;

    let (deduped, duplicates_removed) = if options.remove_duplicates {
        let outcome = debug_span!("dedupe").in_scope(|| drop_duplicate_rows(&missing.table))?;
        (outcome.table, outcome.duplicates_removed)
    } else {
        (missing.table, 0)
    };

    let table = debug_span!("projection", columns = selection.len())
        .in_scope(|| project_columns(&deduped, &selection))?;

    let report = CleaningReport {
        policy: options.missing,
        remove_duplicates: options.remove_duplicates,
        rows_in: raw.height(),
        rows_out: table.height(),
        columns_in: raw.width(),
        columns_out: table.width(),
        rows_with_missing_removed: missing.rows_removed,
        cells_filled: missing.cells_filled,
        duplicates_removed,
        unfilled_columns: missing.unfilled_columns,
    };
    debug!(
        rows_in = report.rows_in,
        rows_out = report.rows_out,
        columns_out = report.columns_out,
        "pipeline finished"
    );
    Ok(CleaningOutcome { table, report })
}
