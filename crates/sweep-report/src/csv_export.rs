//! Comma-separated export of a table.

use std::io::Write;

use anyhow::{Context, Result};

use sweep_common::any_to_string;
use sweep_model::Table;

/// Write `table` as CSV with a header row and no index column.
///
/// Missing cells are written as empty fields. Whole floats lose their
/// fractional zeros, so `1.0` is written as `1`.
pub fn write_csv<W: Write>(table: &Table, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    let names = table.column_names();
    if names.is_empty() {
        return Ok(());
    }
    writer.write_record(&names).context("write csv header")?;
    let columns = table.data().get_columns();
    let mut record = Vec::with_capacity(columns.len());
    for row in 0..table.height() {
        record.clear();
        for column in columns {
            let value = column
                .get(row)
                .with_context(|| format!("read {} row {}", column.name(), row + 1))?;
            record.push(any_to_string(value));
        }
        writer
            .write_record(&record)
            .with_context(|| format!("write csv row {}", row + 1))?;
    }
    writer.flush().context("flush csv output")?;
    Ok(())
}
