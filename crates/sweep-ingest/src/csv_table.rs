use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, bail};
use polars::prelude::{
    Column, CsvReadOptions, DataFrame, DataType, NullValues, PlSmallStr, SerReader,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sweep_model::Table;

const FALLBACK_STEM: &str = "cleaned";

/// Cell texts read as missing, besides empty fields.
pub const DEFAULT_NULL_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options for parsing an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Field separator byte. Defaults to a comma.
    pub separator: u8,
    /// Rows sampled for dtype inference; `None` scans the whole file.
    pub infer_schema_length: Option<usize>,
    /// Cell texts treated as missing in every column.
    pub null_values: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            infer_schema_length: None,
            null_values: DEFAULT_NULL_VALUES.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl IngestOptions {
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    pub fn with_null_values(mut self, values: Vec<String>) -> Self {
        self.null_values = values;
        self
    }

    fn polars_null_values(&self) -> Option<NullValues> {
        if self.null_values.is_empty() {
            return None;
        }
        let values = self
            .null_values
            .iter()
            .map(|value| PlSmallStr::from(value.as_str()))
            .collect();
        Some(NullValues::AllColumns(values))
    }
}

/// An uploaded file parsed into a table.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// File name as uploaded (no directories).
    pub name: String,
    /// Base name used for downloads of the cleaned table.
    pub stem: String,
    /// The raw table. Never modified after loading.
    pub table: Table,
}

/// Trim, strip a byte-order mark and collapse inner whitespace in a header cell.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Download stem for an uploaded file name: everything before the first dot.
pub fn download_stem(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name);
    let stem = base.split('.').next().unwrap_or("").trim();
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// Read a CSV file from disk in full and parse it.
pub fn load_csv_file(path: &Path, options: &IngestOptions) -> Result<LoadedFile> {
    let bytes = std::fs::read(path).with_context(|| format!("read csv: {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    load_csv_bytes(bytes, &name, options).with_context(|| format!("parse csv: {}", path.display()))
}

/// Parse an in-memory upload.
pub fn load_csv_bytes(bytes: Vec<u8>, name: &str, options: &IngestOptions) -> Result<LoadedFile> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        bail!("{name} is empty");
    }
    let separator = options.separator;
    let null_values = options.polars_null_values();
    let data = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(options.infer_schema_length)
        .map_parse_options(|parse| {
            parse
                .with_separator(separator)
                .with_null_values(null_values.clone())
        })
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .with_context(|| format!("read records: {name}"))?;
    if data.width() == 0 {
        bail!("{name} has no header row");
    }
    let mut data = type_empty_columns(data)?;
    normalize_headers(&mut data)?;
    let table = Table::from_frame(data).with_context(|| format!("build table: {name}"))?;
    info!(
        file = name,
        rows = table.height(),
        columns = table.width(),
        "loaded csv"
    );
    for (column, kind) in table.columns() {
        debug!(column = %column.name(), kind = %kind, missing = column.null_count(), "column kind");
    }
    Ok(LoadedFile {
        name: name.to_string(),
        stem: download_stem(name),
        table,
    })
}

/// Columns with no values at all are read as floats, so they count as numeric.
fn type_empty_columns(data: DataFrame) -> Result<DataFrame> {
    if data.height() == 0 {
        return Ok(data);
    }
    let mut columns: Vec<Column> = Vec::with_capacity(data.width());
    for column in data.get_columns() {
        let empty = column.null_count() == column.len()
            && matches!(column.dtype(), DataType::String | DataType::Null);
        if empty {
            debug!(column = %column.name(), "no values, read as float");
            let cast = column
                .cast(&DataType::Float64)
                .with_context(|| format!("cast empty column {}", column.name()))?;
            columns.push(cast);
        } else {
            columns.push(column.clone());
        }
    }
    Ok(DataFrame::new(columns)?)
}

fn normalize_headers(data: &mut DataFrame) -> Result<()> {
    let names: Vec<String> = data
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    for raw in names {
        let normalized = normalize_header(&raw);
        if normalized != raw {
            data.rename(&raw, normalized.as_str().into())
                .with_context(|| format!("rename header {raw:?}"))?;
        }
    }
    Ok(())
}
