use std::path::PathBuf;

use sweep_ingest::IngestOptions;
use sweep_model::{CleaningOptions, ColumnKind, ExportFormat, Table};
use sweep_report::Visualization;
use sweep_transform::CleaningReport;

/// Everything `sweep clean` needs, after settings and flags are merged.
#[derive(Debug, Clone)]
pub struct CleanRequest {
    pub file: PathBuf,
    pub ingest: IngestOptions,
    pub cleaning: CleaningOptions,
    pub x: Option<String>,
    pub y: Option<String>,
    pub bins: usize,
    pub format: ExportFormat,
    /// Defaults to `<file dir>/output`.
    pub output_dir: Option<PathBuf>,
    pub charts_dir: Option<PathBuf>,
    pub preview_rows: usize,
    /// Cap on printed cleaned rows; `None` prints them all.
    pub show_rows: Option<usize>,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct CleanResult {
    pub file_name: String,
    pub raw_rows: usize,
    pub raw_columns: usize,
    pub preview: Table,
    pub report: CleaningReport,
    pub cleaned: Table,
    pub numeric_columns: Vec<String>,
    pub visualization: Visualization,
    pub chart_files: Vec<PathBuf>,
    pub format: ExportFormat,
    pub download_name: String,
    /// `None` on a dry run.
    pub export_path: Option<PathBuf>,
    pub show_rows: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub file: PathBuf,
    pub ingest: IngestOptions,
    pub preview_rows: usize,
}

#[derive(Debug)]
pub struct InspectResult {
    pub file_name: String,
    pub rows: usize,
    pub preview: Table,
    pub columns: Vec<ColumnProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
}
