//! User-chosen cleaning options.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How missing cells are resolved before any other cleaning step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingValuePolicy {
    /// Drop every row that has a missing cell in any column.
    #[default]
    RemoveRows,
    /// Replace missing cells with the zero value of the column kind.
    FillZero,
    /// Replace missing cells of numeric columns with the column mean.
    FillMean,
}

impl MissingValuePolicy {
    pub fn label(self) -> &'static str {
        match self {
            MissingValuePolicy::RemoveRows => "Remove rows",
            MissingValuePolicy::FillZero => "Fill with zeros",
            MissingValuePolicy::FillMean => "Fill with mean",
        }
    }
}

impl fmt::Display for MissingValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Columns to keep in the cleaned table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnSelection {
    #[default]
    All,
    Only(Vec<String>),
}

impl ColumnSelection {
    /// Resolve the selection against the candidate column list.
    ///
    /// `All` keeps every candidate in candidate order; `Only` keeps the
    /// requested order and is validated by the projector.
    pub fn resolve(&self, candidates: &[String]) -> Vec<String> {
        match self {
            ColumnSelection::All => candidates.to_vec(),
            ColumnSelection::Only(names) => names.clone(),
        }
    }
}

/// Resolved options for one run of the cleaning pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    pub missing: MissingValuePolicy,
    pub remove_duplicates: bool,
    pub columns: ColumnSelection,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            missing: MissingValuePolicy::default(),
            remove_duplicates: true,
            columns: ColumnSelection::All,
        }
    }
}

impl CleaningOptions {
    #[must_use]
    pub fn with_missing(mut self, policy: MissingValuePolicy) -> Self {
        self.missing = policy;
        self
    }

    #[must_use]
    pub fn with_remove_duplicates(mut self, enable: bool) -> Self {
        self.remove_duplicates = enable;
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: ColumnSelection) -> Self {
        self.columns = columns;
        self
    }
}
