//! Per-upload session state.
//!
//! A [`Session`] owns the raw table of one uploaded file and the result of
//! the latest cleaning run. Every interaction re-runs the whole pipeline
//! against the raw table, which is never modified. Sessions share nothing,
//! so separate uploads are isolated from each other.

use sweep_ingest::LoadedFile;
use sweep_model::{CleaningOptions, ExportFormat, Result, Table};

use crate::numeric::numeric_columns;
use crate::pipeline::{CleaningOutcome, run_pipeline};

#[derive(Debug)]
pub struct Session {
    file: LoadedFile,
    outcome: Option<CleaningOutcome>,
}

impl Session {
    pub fn new(file: LoadedFile) -> Self {
        Self {
            file,
            outcome: None,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file.name
    }

    pub fn stem(&self) -> &str {
        &self.file.stem
    }

    /// The table as uploaded.
    pub fn raw(&self) -> &Table {
        &self.file.table
    }

    /// First `rows` rows of the raw table.
    pub fn preview(&self, rows: usize) -> Table {
        self.file.table.head(rows)
    }

    /// Run the pipeline with `options`, replacing any earlier result.
    pub fn clean(&mut self, options: &CleaningOptions) -> Result<&CleaningOutcome> {
        let outcome = run_pipeline(&self.file.table, options)?;
        Ok(self.outcome.insert(outcome))
    }

    pub fn outcome(&self) -> Option<&CleaningOutcome> {
        self.outcome.as_ref()
    }

    pub fn cleaned(&self) -> Option<&Table> {
        self.outcome.as_ref().map(|outcome| &outcome.table)
    }

    /// Numeric columns of the cleaned table; empty before the first run.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.cleaned().map(numeric_columns).unwrap_or_default()
    }

    pub fn download_name(&self, format: ExportFormat) -> String {
        format.file_name(&self.file.stem)
    }
}
