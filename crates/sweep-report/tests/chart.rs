//! Integration tests for chart data and SVG output.

use polars::prelude::{IntoColumn, NamedFrom, Series};
use tempfile::TempDir;

use sweep_model::Table;
use sweep_report::{
    AxisChoice, ChartError, DEFAULT_BINS, Visualization, build_visualization, write_chart_files,
};

fn scores() -> Table {
    Table::from_columns(vec![
        Series::new("name".into(), ["a", "b", "c", "d"]).into_column(),
        Series::new("age".into(), [Some(20i64), Some(30), None, Some(40)]).into_column(),
        Series::new("score".into(), [1.5f64, 2.5, 3.5, 4.5]).into_column(),
    ])
    .expect("build table")
}

fn charts(vis: Visualization) -> sweep_report::ChartSet {
    match vis {
        Visualization::Charts(set) => set,
        Visualization::Skipped { warning } => panic!("unexpected skip: {warning}"),
    }
}

#[test]
fn axes_default_to_first_numeric_column() {
    let axes = AxisChoice::resolve(&scores(), None, None)
        .expect("resolve")
        .expect("numeric columns");
    assert_eq!(axes.x, "age");
    assert_eq!(axes.y, "age");
    assert!(axes.is_same());
}

#[test]
fn same_axes_suppress_scatter_only() {
    let set = charts(build_visualization(&scores(), None, None, DEFAULT_BINS).expect("charts"));
    assert!(set.scatter.is_none());
    assert_eq!(
        set.axis_message.as_deref(),
        Some("X and Y axes cannot be the same!")
    );
    assert_eq!(set.histogram.total(), 3);
    assert!(set.box_plot.is_some());
}

#[test]
fn scatter_pairs_skip_missing_rows() {
    let set = charts(
        build_visualization(&scores(), Some("age"), Some("score"), 4).expect("charts"),
    );
    let scatter = set.scatter.expect("scatter");
    assert_eq!(scatter.points, vec![(20.0, 1.5), (30.0, 2.5), (40.0, 4.5)]);
    assert!(set.axis_message.is_none());
    assert_eq!(set.histogram.counts.len(), 4);
    assert_eq!(set.histogram.edges.first(), Some(&20.0));
    assert_eq!(set.histogram.edges.last(), Some(&40.0));
}

#[test]
fn text_only_table_skips_visualization() {
    let table =
        Table::from_columns(vec![Series::new("name".into(), ["a", "b"]).into_column()]).unwrap();
    let vis = build_visualization(&table, None, None, DEFAULT_BINS).expect("visualization");
    match vis {
        Visualization::Skipped { warning } => {
            assert!(warning.starts_with("No numeric columns available to visualize"));
        }
        Visualization::Charts(_) => panic!("expected skip"),
    }
}

#[test]
fn non_numeric_axis_is_rejected() {
    let err = build_visualization(&scores(), Some("name"), None, DEFAULT_BINS).unwrap_err();
    assert!(matches!(err, ChartError::NotNumeric(ref name) if name == "name"));
    let err = build_visualization(&scores(), None, Some("nope"), DEFAULT_BINS).unwrap_err();
    assert!(matches!(err, ChartError::UnknownColumn(_)));
}

#[test]
fn zero_bins_is_an_error() {
    let err = build_visualization(&scores(), None, None, 0).unwrap_err();
    assert!(matches!(err, ChartError::NoBins));
}

#[test]
fn chart_files_are_written() {
    let dir = TempDir::new().expect("temp dir");
    let set = charts(
        build_visualization(&scores(), Some("age"), Some("score"), DEFAULT_BINS).expect("charts"),
    );
    let paths = write_chart_files(dir.path(), &set).expect("write charts");
    let names: Vec<_> = paths
        .iter()
        .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
        .collect();
    assert_eq!(names, vec!["scatter.svg", "histogram.svg", "boxplot.svg"]);

    let scatter = std::fs::read_to_string(&paths[0]).expect("read scatter");
    assert!(scatter.starts_with("<svg"));
    assert_eq!(scatter.matches("<circle").count(), 3);
    assert!(scatter.contains("Scatter plot of age vs score"));
}
