//! Export a cleaned table in the chosen format.

use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use sweep_model::{ExportFormat, Table};

use crate::csv_export::write_csv;
use crate::xlsx::write_xlsx;

/// Serialize `table` into an in-memory download payload.
pub fn export_bytes(table: &Table, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => {
            let mut buffer = Vec::new();
            write_csv(table, &mut buffer)?;
            Ok(buffer)
        }
        ExportFormat::Excel => {
            let cursor = write_xlsx(table, Cursor::new(Vec::new()))?;
            Ok(cursor.into_inner())
        }
    }
}

/// Write `table` to `<dir>/<stem>.<ext>`, creating `dir` if needed.
pub fn export_table(
    table: &Table,
    format: ExportFormat,
    dir: &Path,
    stem: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(format.file_name(stem));
    let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
    match format {
        ExportFormat::Csv => {
            let mut writer = BufWriter::new(file);
            write_csv(table, &mut writer)?;
            writer
                .flush()
                .with_context(|| format!("flush {}", path.display()))?;
        }
        ExportFormat::Excel => {
            let mut writer = write_xlsx(table, BufWriter::new(file))?;
            writer
                .flush()
                .with_context(|| format!("flush {}", path.display()))?;
        }
    }
    info!(
        path = %path.display(),
        format = %format,
        rows = table.height(),
        columns = table.width(),
        "exported cleaned table"
    );
    Ok(path)
}
