//! Table loading for the data sweeper.
//!
//! Reads an uploaded comma-separated file in full and turns it into a
//! [`sweep_model::Table`] with column kinds tagged.

pub mod csv_table;

pub use csv_table::{
    DEFAULT_NULL_VALUES, IngestOptions, LoadedFile, download_stem, load_csv_bytes, load_csv_file, normalize_header,
};
