//! Missing-value policies.
//!
//! Each policy returns a new table; the input is never modified.

use std::collections::BTreeSet;

use polars::prelude::{BooleanChunked, Column, IntoColumn, NamedFrom, NewChunkedArray, Series};
use tracing::{debug, warn};

use sweep_model::{ColumnKind, MissingValuePolicy, Result, Table};

use crate::numeric::numeric_columns;

/// Zero value written into missing text cells by [`MissingValuePolicy::FillZero`].
pub const TEXT_ZERO: &str = "0";

/// Result of applying a missing-value policy.
#[derive(Debug, Clone)]
pub struct MissingOutcome {
    pub table: Table,
    /// Rows dropped by `RemoveRows`.
    pub rows_removed: usize,
    /// Cells written by `FillZero` or `FillMean`.
    pub cells_filled: usize,
    /// Numeric columns `FillMean` could not fill because they hold no values.
    pub unfilled_columns: Vec<String>,
}

impl MissingOutcome {
    fn unchanged(table: Table) -> Self {
        Self {
            table,
            rows_removed: 0,
            cells_filled: 0,
            unfilled_columns: Vec::new(),
        }
    }
}

/// Resolve missing cells of `table` according to `policy`.
pub fn apply_missing_policy(table: &Table, policy: MissingValuePolicy) -> Result<MissingOutcome> {
    if table.missing_count() == 0 {
        debug!(policy = %policy, "no missing cells");
        return Ok(MissingOutcome::unchanged(table.clone()));
    }
    match policy {
        MissingValuePolicy::RemoveRows => remove_incomplete_rows(table),
        MissingValuePolicy::FillZero => fill_zero(table),
        MissingValuePolicy::FillMean => fill_mean(table),
    }
}

/// Arithmetic mean of the present values, `None` when there are none.
pub fn column_mean(values: &[Option<f64>]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values.iter().flatten() {
        sum += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn remove_incomplete_rows(table: &Table) -> Result<MissingOutcome> {
    let height = table.height();
    let mut keep = vec![true; height];
    for (column, _) in table.columns() {
        if column.null_count() == 0 {
            continue;
        }
        let nulls = column.as_materialized_series().is_null();
        for (idx, is_null) in nulls.into_iter().enumerate() {
            if is_null == Some(true) {
                keep[idx] = false;
            }
        }
    }
    let mask = BooleanChunked::from_slice("complete".into(), &keep);
    let cleaned = Table::from_frame(table.data().filter(&mask)?)?;
    let rows_removed = height - cleaned.height();
    debug!(rows_removed, "removed rows with missing cells");
    Ok(MissingOutcome {
        table: cleaned,
        rows_removed,
        cells_filled: 0,
        unfilled_columns: Vec::new(),
    })
}

fn fill_zero(table: &Table) -> Result<MissingOutcome> {
    let mut columns = Vec::with_capacity(table.width());
    let mut cells_filled = 0usize;
    for (column, kind) in table.columns() {
        let missing = column.null_count();
        if missing == 0 {
            columns.push(column.clone());
            continue;
        }
        let filled = match kind {
            ColumnKind::Integer => fill_integer(column, 0)?,
            ColumnKind::Float => fill_float(column, 0.0)?,
            ColumnKind::Text => fill_text(column, TEXT_ZERO)?,
        };
        cells_filled += missing;
        columns.push(filled);
    }
    debug!(cells_filled, "filled missing cells with zero");
    Ok(MissingOutcome {
        table: Table::from_columns(columns)?,
        rows_removed: 0,
        cells_filled,
        unfilled_columns: Vec::new(),
    })
}

fn fill_mean(table: &Table) -> Result<MissingOutcome> {
    let targets: BTreeSet<String> = numeric_columns(table).into_iter().collect();
    let mut columns = Vec::with_capacity(table.width());
    let mut cells_filled = 0usize;
    let mut unfilled_columns = Vec::new();
    for (column, _) in table.columns() {
        let name = column.name().to_string();
        let missing = column.null_count();
        if missing == 0 || !targets.contains(&name) {
            columns.push(column.clone());
            continue;
        }
        let values = table.numeric_values(&name)?;
        match column_mean(&values) {
            Some(mean) => {
                debug!(column = %name, mean, missing, "filling with column mean");
                columns.push(fill_float_values(column, &values, mean));
                cells_filled += missing;
            }
            None => {
                warn!(column = %name, "column has no values to average, leaving cells missing");
                unfilled_columns.push(name);
                columns.push(column.clone());
            }
        }
    }
    Ok(MissingOutcome {
        table: Table::from_columns(columns)?,
        rows_removed: 0,
        cells_filled,
        unfilled_columns,
    })
}

fn fill_integer(column: &Column, value: i64) -> Result<Column> {
    let values: Vec<i64> = column
        .as_materialized_series()
        .i64()?
        .into_iter()
        .map(|cell| cell.unwrap_or(value))
        .collect();
    Ok(Series::new(column.name().clone(), values).into_column())
}

fn fill_float(column: &Column, value: f64) -> Result<Column> {
    let values: Vec<f64> = column
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|cell| cell.unwrap_or(value))
        .collect();
    Ok(Series::new(column.name().clone(), values).into_column())
}

fn fill_text(column: &Column, value: &str) -> Result<Column> {
    let values: Vec<&str> = column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|cell| cell.unwrap_or(value))
        .collect();
    Ok(Series::new(column.name().clone(), values).into_column())
}

// Integer columns come back as floats: the mean is generally fractional.
fn fill_float_values(column: &Column, values: &[Option<f64>], value: f64) -> Column {
    let filled: Vec<f64> = values.iter().map(|cell| cell.unwrap_or(value)).collect();
    Series::new(column.name().clone(), filled).into_column()
}
