use std::collections::HashSet;

use sweep_model::{Result, SweepError, Table};

/// Check that every selected name exists in `table` and appears once.
pub fn validate_selection(table: &Table, names: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !table.has_column(name) {
            return Err(SweepError::UnknownColumn { name: name.clone() });
        }
        if !seen.insert(name.as_str()) {
            return Err(SweepError::DuplicateColumn { name: name.clone() });
        }
    }
    Ok(())
}

/// Keep only `names`, in the given order.
pub fn project_columns(table: &Table, names: &[String]) -> Result<Table> {
    validate_selection(table, names)?;
    let columns = names
        .iter()
        .map(|name| table.column(name).cloned())
        .collect::<Result<Vec<_>>>()?;
    Table::from_columns(columns)
}
