//! Output generation for cleaned tables.
//!
//! - **chart**: scatter, histogram and box plot data for numeric columns
//! - **svg**: standalone SVG rendering of those charts
//! - **csv_export**: comma-separated export
//! - **xlsx**: single-sheet Excel workbook export

mod common;

pub mod chart;
pub mod csv_export;
pub mod export;
pub mod svg;
pub mod xlsx;

pub use chart::{
    AxisChoice, BoxPlot, ChartError, ChartSet, DEFAULT_BINS, Histogram, ScatterSeries,
    Visualization, build_visualization,
};
pub use csv_export::write_csv;
pub use export::{export_bytes, export_table};
pub use svg::{render_box_plot, render_histogram, render_scatter, write_chart_files};
pub use xlsx::write_xlsx;
