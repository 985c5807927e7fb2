//! In-memory table with explicit per-column kinds.
//!
//! A [`Table`] wraps a Polars [`DataFrame`] and records a [`ColumnKind`] for
//! every column. Kinds are derived from the column dtypes whenever a table is
//! built, so every transformation that produces a new frame goes back through
//! [`Table::from_frame`] and gets its kinds re-validated.
//!
//! Storage is normalized on construction:
//!
//! - integer dtypes are stored as `Int64` (`UInt64` as `Float64`)
//! - float and all-null dtypes are stored as `Float64`
//! - everything else is cast to `String`

use std::fmt;

use polars::prelude::{AnyValue, Column, DataFrame, DataType};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};

/// Inferred kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    /// Derive the kind for a Polars dtype.
    pub fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::UInt64 | DataType::Null => ColumnKind::Float,
            dtype if dtype.is_integer() => ColumnKind::Integer,
            dtype if dtype.is_float() => ColumnKind::Float,
            _ => ColumnKind::Text,
        }
    }

    /// The dtype columns of this kind are stored as.
    pub fn storage_dtype(self) -> DataType {
        match self {
            ColumnKind::Integer => DataType::Int64,
            ColumnKind::Float => DataType::Float64,
            ColumnKind::Text => DataType::String,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, row-aligned collection of named columns.
#[derive(Debug, Clone)]
pub struct Table {
    data: DataFrame,
    kinds: Vec<ColumnKind>,
}

impl Table {
    /// Build a table from a frame, normalizing storage and tagging column kinds.
    pub fn from_frame(data: DataFrame) -> Result<Self> {
        let mut columns: Vec<Column> = Vec::with_capacity(data.width());
        let mut kinds = Vec::with_capacity(data.width());
        for column in data.get_columns() {
            let kind = ColumnKind::from_dtype(column.dtype());
            let target = kind.storage_dtype();
            let normalized = if column.dtype() == &target {
                column.clone()
            } else {
                column
                    .cast(&target)
                    .map_err(|_| SweepError::UnsupportedColumnType {
                        name: column.name().to_string(),
                        dtype: column.dtype().to_string(),
                    })?
            };
            columns.push(normalized);
            kinds.push(kind);
        }
        let data = DataFrame::new(columns)?;
        Ok(Self { data, kinds })
    }

    /// Build a table from loose columns (all must share one length).
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        Self::from_frame(DataFrame::new(columns)?)
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_frame(self) -> DataFrame {
        self.data
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.data.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        let idx = self.data.get_column_index(name)?;
        self.kinds.get(idx).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.get_column_index(name).is_some()
    }

    /// Columns paired with their kinds, in table order.
    pub fn columns(&self) -> impl Iterator<Item = (&Column, ColumnKind)> {
        self.data
            .get_columns()
            .iter()
            .zip(self.kinds.iter().copied())
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.data
            .column(name)
            .map_err(|_| SweepError::UnknownColumn {
                name: name.to_string(),
            })
    }

    /// Cell value at `row` of column `name`.
    pub fn get(&self, name: &str, row: usize) -> Result<AnyValue<'_>> {
        Ok(self.column(name)?.get(row)?)
    }

    /// Values of a numeric column as `f64`, `None` for missing cells.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self.column(name)?;
        if !ColumnKind::from_dtype(column.dtype()).is_numeric() {
            return Err(SweepError::Message(format!("column {name} is not numeric")));
        }
        let cast = column.cast(&DataType::Float64)?;
        let values = cast.as_materialized_series().f64()?.into_iter().collect();
        Ok(values)
    }

    /// Total number of missing cells across all columns.
    pub fn missing_count(&self) -> usize {
        self.data
            .get_columns()
            .iter()
            .map(Column::null_count)
            .sum()
    }

    /// Missing cell count per column, in table order.
    pub fn missing_by_column(&self) -> Vec<(String, usize)> {
        self.data
            .get_columns()
            .iter()
            .map(|column| (column.name().to_string(), column.null_count()))
            .collect()
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Self {
            data: self.data.head(Some(n)),
            kinds: self.kinds.clone(),
        }
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.kinds == other.kinds && self.data.equals_missing(&other.data)
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    use super::*;

    #[test]
    fn kinds_follow_dtypes() {
        assert_eq!(ColumnKind::from_dtype(&DataType::Int32), ColumnKind::Integer);
        assert_eq!(ColumnKind::from_dtype(&DataType::UInt64), ColumnKind::Float);
        assert_eq!(ColumnKind::from_dtype(&DataType::Null), ColumnKind::Float);
        assert_eq!(ColumnKind::from_dtype(&DataType::Float32), ColumnKind::Float);
        assert_eq!(ColumnKind::from_dtype(&DataType::Boolean), ColumnKind::Text);
        assert_eq!(ColumnKind::from_dtype(&DataType::String), ColumnKind::Text);
    }

    #[test]
    fn from_frame_normalizes_storage() {
        let table = Table::from_columns(vec![
            Series::new("small".into(), &[1i32, 2]).into_column(),
            Series::new("flag".into(), &[true, false]).into_column(),
            Series::new("ratio".into(), &[0.5f32, 1.5]).into_column(),
        ])
        .unwrap();

        assert_eq!(
            table.kinds(),
            &[ColumnKind::Integer, ColumnKind::Text, ColumnKind::Float]
        );
        assert_eq!(table.column("small").unwrap().dtype(), &DataType::Int64);
        assert_eq!(table.column("flag").unwrap().dtype(), &DataType::String);
        assert_eq!(table.column("ratio").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn head_keeps_kinds() {
        let table = Table::from_columns(vec![
            Series::new("a".into(), &[1i64, 2, 3]).into_column(),
        ])
        .unwrap();
        let head = table.head(2);
        assert_eq!(head.height(), 2);
        assert_eq!(head.kinds(), table.kinds());
    }
}
