use std::collections::HashSet;

use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NewChunkedArray};
use tracing::debug;

use sweep_common::any_to_string;
use sweep_model::{Result, Table};

/// Result of duplicate removal.
#[derive(Debug, Clone)]
pub struct DedupeOutcome {
    pub table: Table,
    pub duplicates_removed: usize,
}

/// Remove rows equal in every column to an earlier row.
///
/// The first occurrence survives and surviving rows keep their order. Missing
/// cells compare equal to each other.
pub fn drop_duplicate_rows(table: &Table) -> Result<DedupeOutcome> {
    let height = table.height();
    if height == 0 {
        return Ok(DedupeOutcome {
            table: table.clone(),
            duplicates_removed: 0,
        });
    }
    let df = table.data();
    let mut seen = HashSet::with_capacity(height);
    let mut keep = Vec::with_capacity(height);
    for idx in 0..height {
        keep.push(seen.insert(row_key(df, idx)?));
    }
    let duplicates_removed = keep.iter().filter(|kept| !**kept).count();
    if duplicates_removed == 0 {
        return Ok(DedupeOutcome {
            table: table.clone(),
            duplicates_removed,
        });
    }
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    let table = Table::from_frame(df.filter(&mask)?)?;
    debug!(duplicates_removed, "removed duplicate rows");
    Ok(DedupeOutcome {
        table,
        duplicates_removed,
    })
}

fn row_key(df: &DataFrame, idx: usize) -> Result<Vec<Option<String>>> {
    let mut key = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let cell = match column.get(idx)? {
            AnyValue::Null => None,
            value => Some(any_to_string(value)),
        };
        key.push(cell);
    }
    Ok(key)
}
