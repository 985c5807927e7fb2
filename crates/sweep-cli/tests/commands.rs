//! Integration tests for the `clean` and `inspect` commands.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use sweep_cli::commands::{run_clean, run_inspect};
use sweep_cli::config::load_settings;
use sweep_cli::summary::{cleaned_rows, columns_table, preview_table, report_table};
use sweep_cli::types::{CleanRequest, InspectRequest};
use sweep_ingest::IngestOptions;
use sweep_model::{
    CleaningOptions, ColumnKind, ColumnSelection, ExportFormat, MissingValuePolicy,
};
use sweep_report::Visualization;

const SCORES: &str = "name,age,score\nann,20,1.5\nbo,,2.5\nann,20,1.5\ncy,40,\n";

fn write_input(dir: &Path) -> PathBuf {
    let path = dir.join("scores.v2.csv");
    fs::write(&path, SCORES).expect("write input");
    path
}

fn request(file: PathBuf) -> CleanRequest {
    CleanRequest {
        file,
        ingest: IngestOptions::default(),
        cleaning: CleaningOptions::default(),
        x: None,
        y: None,
        bins: 20,
        format: ExportFormat::Csv,
        output_dir: None,
        charts_dir: None,
        preview_rows: 5,
        show_rows: None,
        dry_run: false,
    }
}

#[test]
fn clean_exports_next_to_input_by_default() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_input(dir.path());

    let result = run_clean(&request(file)).expect("clean");

    let expected = dir.path().join("output").join("scores.csv");
    assert_eq!(result.export_path.as_deref(), Some(expected.as_path()));
    assert_eq!(result.download_name, "scores.csv");
    assert_eq!(
        fs::read_to_string(&expected).expect("read export"),
        "name,age,score\nann,20,1.5\n"
    );
    assert_eq!(result.raw_rows, 4);
    assert_eq!(result.report.rows_with_missing_removed, 2);
    assert_eq!(result.report.duplicates_removed, 1);
    insta::assert_json_snapshot!(result.report, @r#"
    {
      "policy": "remove-rows",
      "remove_duplicates": true,
      "rows_in": 4,
      "rows_out": 1,
      "columns_in": 3,
      "columns_out": 3,
      "rows_with_missing_removed": 2,
      "cells_filled": 0,
      "duplicates_removed": 1,
      "unfilled_columns": []
    }
    "#);
}

#[test]
fn fill_mean_excel_export_with_charts() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_input(dir.path());
    let mut req = request(file);
    req.cleaning = CleaningOptions::default()
        .with_missing(MissingValuePolicy::FillMean)
        .with_remove_duplicates(false);
    req.format = ExportFormat::Excel;
    req.output_dir = Some(dir.path().join("exports"));
    req.charts_dir = Some(dir.path().join("charts"));
    req.x = Some("age".to_string());
    req.y = Some("score".to_string());

    let result = run_clean(&req).expect("clean");

    assert_eq!(result.cleaned.height(), 4);
    assert_eq!(result.cleaned.missing_count(), 0);
    assert_eq!(result.cleaned.kind("age"), Some(ColumnKind::Float));
    assert_eq!(result.numeric_columns, vec!["age", "score"]);
    let export = result.export_path.expect("export path");
    assert_eq!(export, dir.path().join("exports").join("scores.xlsx"));
    assert_eq!(&fs::read(&export).expect("read xlsx")[..2], b"PK");
    assert_eq!(result.chart_files.len(), 3);
    assert!(dir.path().join("charts").join("histogram.svg").is_file());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_input(dir.path());
    let mut req = request(file);
    req.dry_run = true;
    req.charts_dir = Some(dir.path().join("charts"));

    let result = run_clean(&req).expect("clean");

    assert!(result.export_path.is_none());
    assert!(result.chart_files.is_empty());
    assert!(!dir.path().join("output").exists());
    assert!(!dir.path().join("charts").exists());
}

#[test]
fn text_only_selection_skips_charts_but_exports() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_input(dir.path());
    let mut req = request(file);
    req.cleaning = CleaningOptions::default()
        .with_missing(MissingValuePolicy::FillZero)
        .with_columns(ColumnSelection::Only(vec!["name".to_string()]));

    let result = run_clean(&req).expect("clean");

    assert!(matches!(result.visualization, Visualization::Skipped { .. }));
    let export = result.export_path.expect("export path");
    assert_eq!(
        fs::read_to_string(export).expect("read export"),
        "name\nann\nbo\ncy\n"
    );
}

#[test]
fn unknown_column_selection_fails() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_input(dir.path());
    let mut req = request(file);
    req.cleaning = CleaningOptions::default()
        .with_columns(ColumnSelection::Only(vec!["height".to_string()]));

    let err = run_clean(&req).unwrap_err();
    assert!(format!("{err:#}").contains("unknown column: height"));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let err = run_clean(&request(dir.path().join("absent.csv"))).unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
}

#[test]
fn inspect_reports_kinds_and_missing() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_input(dir.path());
    let result = run_inspect(&InspectRequest {
        file,
        ingest: IngestOptions::default(),
        preview_rows: 2,
    })
    .expect("inspect");

    assert_eq!(result.file_name, "scores.v2.csv");
    assert_eq!(result.rows, 4);
    assert_eq!(result.preview.height(), 2);
    let kinds: Vec<_> = result
        .columns
        .iter()
        .map(|column| (column.name.as_str(), column.kind, column.missing))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("name", ColumnKind::Text, 0),
            ("age", ColumnKind::Integer, 1),
            ("score", ColumnKind::Float, 1),
        ]
    );

    let rendered = columns_table(&result.columns).to_string();
    assert!(rendered.contains("integer"));
    let preview = preview_table(&result.preview)
        .expect("render preview")
        .to_string();
    assert!(preview.contains("ann"));
    assert!(preview.contains("null"));
}

#[test]
fn report_table_lists_policy() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_input(dir.path());
    let mut req = request(file);
    req.dry_run = true;
    req.cleaning = CleaningOptions::default().with_missing(MissingValuePolicy::FillZero);

    let result = run_clean(&req).expect("clean");
    let rendered = report_table(&result.report).to_string();
    assert!(rendered.contains("Fill with zeros"));
    assert!(rendered.contains("4 -> 3"));
}

#[test]
fn settings_file_is_read_and_bad_files_fall_back() {
    let dir = TempDir::new().expect("temp dir");
    let good = dir.path().join("good.toml");
    fs::write(&good, "[display]\npreview_rows = 9\n").expect("write settings");
    assert_eq!(load_settings(Some(&good)).display.preview_rows, 9);

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[display\n").expect("write settings");
    assert_eq!(load_settings(Some(&bad)).display.preview_rows, 5);

    let absent = dir.path().join("absent.toml");
    assert_eq!(load_settings(Some(&absent)).charts.bins, 20);
}

#[test]
fn text_axis_skips_charts_but_still_exports() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_input(dir.path());
    let mut req = request(file);
    req.x = Some("name".to_string());
    req.charts_dir = Some(dir.path().join("charts"));

    let result = run_clean(&req).expect("clean");

    match &result.visualization {
        Visualization::Skipped { warning } => assert!(warning.contains("column name is not numeric")),
        other => panic!("expected skipped charts, got {other:?}"),
    }
    assert!(result.chart_files.is_empty());
    assert!(result.export_path.expect("export path").is_file());
}

#[test]
fn zero_bins_skips_charts_but_still_exports() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_input(dir.path());
    let mut req = request(file);
    req.bins = 0;

    let result = run_clean(&req).expect("clean");

    assert!(matches!(result.visualization, Visualization::Skipped { .. }));
    assert!(result.export_path.expect("export path").is_file());
}

#[test]
fn cleaned_table_prints_every_row_unless_capped() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_input(dir.path());
    let mut req = request(file);
    req.cleaning = CleaningOptions::default()
        .with_missing(MissingValuePolicy::FillZero)
        .with_remove_duplicates(false);
    req.preview_rows = 1;
    req.dry_run = true;

    let result = run_clean(&req).expect("clean");
    assert_eq!(result.preview.height(), 1);
    let shown = cleaned_rows(&result);
    assert_eq!(shown.height(), 4);
    let rendered = preview_table(&shown).expect("render cleaned").to_string();
    assert!(rendered.contains("cy"));
    assert!(!rendered.contains("null"));

    req.show_rows = Some(2);
    let capped = run_clean(&req).expect("clean");
    assert_eq!(cleaned_rows(&capped).height(), 2);
}
