use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("unknown column: {name}")]
    UnknownColumn { name: String },
    #[error("column selected more than once: {name}")]
    DuplicateColumn { name: String },
    #[error("column {name} has unsupported type {dtype}")]
    UnsupportedColumnType { name: String, dtype: String },
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, SweepError>;
