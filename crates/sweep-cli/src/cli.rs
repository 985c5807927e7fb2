//! CLI argument definitions for the data sweeper.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use sweep_model::{ExportFormat, MissingValuePolicy};

#[derive(Parser)]
#[command(
    name = "sweep",
    version,
    about = "Data sweeper - clean, chart and convert CSV files",
    long_about = "Load a CSV file, handle missing values, drop duplicate rows and keep\n\
                  the columns you need. Summarizes the numeric columns as charts and\n\
                  exports the cleaned table as CSV or Excel."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: settings.toml in the user config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean a CSV file, summarize its numeric columns and export it.
    Clean(CleanArgs),

    /// Show a preview, column kinds and missing counts without cleaning.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct CleanArgs {
    /// CSV file to clean (first row is the header).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// How to handle missing values.
    #[arg(long = "missing", value_enum)]
    pub missing: Option<MissingArg>,

    /// Keep duplicate rows instead of removing them.
    #[arg(long = "keep-duplicates")]
    pub keep_duplicates: bool,

    /// Columns to keep, in order (default: all columns).
    #[arg(long = "columns", value_name = "COL", value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// X-axis column for the charts (default: first numeric column).
    #[arg(long = "x", value_name = "COL")]
    pub x: Option<String>,

    /// Y-axis column for the scatter plot (default: first numeric column).
    #[arg(long = "y", value_name = "COL")]
    pub y: Option<String>,

    /// Export format.
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,

    /// Output directory for the export (default: <FILE dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write scatter, histogram and box plot SVG files to this directory.
    #[arg(long = "charts-dir", value_name = "DIR")]
    pub charts_dir: Option<PathBuf>,

    /// Histogram bin count.
    #[arg(long = "bins", value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub bins: Option<u32>,

    /// Rows shown in the data previews.
    #[arg(long = "preview-rows", value_name = "N")]
    pub preview_rows: Option<usize>,

    /// Rows of the cleaned table to print (default: all).
    #[arg(long = "show-rows", value_name = "N")]
    pub show_rows: Option<usize>,

    /// Field separator of the input file.
    #[arg(long = "separator", value_name = "CHAR", default_value = ",")]
    pub separator: char,

    /// Clean and report without writing any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// CSV file to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Rows shown in the preview.
    #[arg(long = "preview-rows", value_name = "N")]
    pub preview_rows: Option<usize>,

    /// Field separator of the input file.
    #[arg(long = "separator", value_name = "CHAR", default_value = ",")]
    pub separator: char,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MissingArg {
    RemoveRows,
    FillZero,
    FillMean,
}

impl From<MissingArg> for MissingValuePolicy {
    fn from(value: MissingArg) -> Self {
        match value {
            MissingArg::RemoveRows => MissingValuePolicy::RemoveRows,
            MissingArg::FillZero => MissingValuePolicy::FillZero,
            MissingArg::FillMean => MissingValuePolicy::FillMean,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Excel,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Excel => ExportFormat::Excel,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
