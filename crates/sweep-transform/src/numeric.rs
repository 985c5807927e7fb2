//! Numeric column detection.
//!
//! Reads the kind tags a [`Table`] computes when it is built, so the answer
//! always reflects the table it is asked about.

use sweep_model::Table;

/// Names of the numeric columns of `table`, in table order.
pub fn numeric_columns(table: &Table) -> Vec<String> {
    table
        .columns()
        .filter(|(_, kind)| kind.is_numeric())
        .map(|(column, _)| column.name().to_string())
        .collect()
}

pub fn has_numeric_columns(table: &Table) -> bool {
    table.kinds().iter().any(|kind| kind.is_numeric())
}
