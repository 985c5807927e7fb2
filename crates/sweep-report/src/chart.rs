//! Chart data for the numeric columns of a cleaned table.
//!
//! Only the numbers behind the charts are computed here; [`crate::svg`]
//! turns them into images.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use sweep_model::{SweepError, Table};
use sweep_transform::numeric_columns;

/// Histogram bin count used when none is configured.
pub const DEFAULT_BINS: usize = 20;

pub const NO_NUMERIC_COLUMNS: &str =
    "No numeric columns available to visualize. Please clean the data and try again.";
pub const SAME_AXES: &str = "X and Y axes cannot be the same!";

const WHISKER_RANGE: f64 = 1.5;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("column {0} is not numeric")]
    NotNumeric(String),
    #[error("histogram needs at least one bin")]
    NoBins,
    #[error(transparent)]
    Table(#[from] SweepError),
}

/// Resolved X and Y axis columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisChoice {
    pub x: String,
    pub y: String,
}

impl AxisChoice {
    /// Pick axes among the numeric columns of `table`.
    ///
    /// Unset axes default to the first numeric column. Returns `Ok(None)` when
    /// the table has no numeric columns.
    pub fn resolve(
        table: &Table,
        x: Option<&str>,
        y: Option<&str>,
    ) -> Result<Option<Self>, ChartError> {
        let numeric = numeric_columns(table);
        let Some(first) = numeric.first() else {
            return Ok(None);
        };
        let pick = |requested: Option<&str>| -> Result<String, ChartError> {
            match requested {
                None => Ok(first.clone()),
                Some(name) if numeric.iter().any(|candidate| candidate == name) => {
                    Ok(name.to_string())
                }
                Some(name) if table.has_column(name) => {
                    Err(ChartError::NotNumeric(name.to_string()))
                }
                Some(name) => Err(ChartError::UnknownColumn(name.to_string())),
            }
        };
        Ok(Some(Self {
            x: pick(x)?,
            y: pick(y)?,
        }))
    }

    pub fn is_same(&self) -> bool {
        self.x == self.y
    }
}

/// Paired values of two columns, rows with a missing side dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
}

/// Equal-width histogram. `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Box-and-whisker summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlot {
    pub column: String,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxPlot {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Charts for one axis choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub axes: AxisChoice,
    /// `None` when both axes name the same column.
    pub scatter: Option<ScatterSeries>,
    /// Validation message shown instead of the scatter plot.
    pub axis_message: Option<String>,
    pub histogram: Histogram,
    /// `None` when the X column has no values.
    pub box_plot: Option<BoxPlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Visualization {
    /// Nothing numeric to draw; export still proceeds.
    Skipped { warning: String },
    Charts(ChartSet),
}

/// Build the scatter, histogram and box plot data for `table`.
pub fn build_visualization(
    table: &Table,
    x: Option<&str>,
    y: Option<&str>,
    bins: usize,
) -> Result<Visualization, ChartError> {
    if bins == 0 {
        return Err(ChartError::NoBins);
    }
    let Some(axes) = AxisChoice::resolve(table, x, y)? else {
        warn!("{NO_NUMERIC_COLUMNS}");
        return Ok(Visualization::Skipped {
            warning: NO_NUMERIC_COLUMNS.to_string(),
        });
    };
    let x_values = table.numeric_values(&axes.x)?;
    let (scatter, axis_message) = if axes.is_same() {
        warn!(column = %axes.x, "{SAME_AXES}");
        (None, Some(SAME_AXES.to_string()))
    } else {
        let y_values = table.numeric_values(&axes.y)?;
        let series = scatter_series(&axes.x, &axes.y, &x_values, &y_values);
        (Some(series), None)
    };
    let present: Vec<f64> = x_values.iter().flatten().copied().collect();
    let histogram = histogram(&axes.x, &present, bins);
    let box_plot = box_plot(&axes.x, &present);
    debug!(x = %axes.x, y = %axes.y, values = present.len(), "built chart data");
    Ok(Visualization::Charts(ChartSet {
        axes,
        scatter,
        axis_message,
        histogram,
        box_plot,
    }))
}

pub fn scatter_series(
    x_label: &str,
    y_label: &str,
    x_values: &[Option<f64>],
    y_values: &[Option<f64>],
) -> ScatterSeries {
    let points = x_values
        .iter()
        .zip(y_values)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    ScatterSeries {
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        points,
    }
}

/// Equal-width bins over `[min, max]`; the last bin includes `max`.
///
/// A single distinct value gets the range `[v - 0.5, v + 0.5]`.
pub fn histogram(column: &str, values: &[f64], bins: usize) -> Histogram {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Histogram {
            column: column.to_string(),
            edges: Vec::new(),
            counts: Vec::new(),
        };
    }
    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|idx| lo + width * idx as f64).collect();
    let mut counts = vec![0usize; bins];
    for value in finite {
        let idx = (((value - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Histogram {
        column: column.to_string(),
        edges,
        counts,
    }
}

/// Quartiles by linear interpolation, whiskers at the furthest points within
/// 1.5 IQR of the box.
pub fn box_plot(column: &str, values: &[f64]) -> Option<BoxPlot> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let reach = WHISKER_RANGE * (q3 - q1);
    let (low_fence, high_fence) = (q1 - reach, q3 + reach);
    let inside = || sorted.iter().copied().filter(|v| *v >= low_fence && *v <= high_fence);
    let lower_whisker = inside().fold(f64::INFINITY, f64::min);
    let upper_whisker = inside().fold(f64::NEG_INFINITY, f64::max);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();
    Some(BoxPlot {
        column: column.to_string(),
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

// `sorted` must be non-empty and ascending.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let position = (sorted.len() - 1) as f64 * p;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
