//! Integration tests for CSV and XLSX export.

use std::io::{Cursor, Read};

use polars::prelude::{IntoColumn, NamedFrom, Series};
use tempfile::TempDir;
use zip::ZipArchive;

use sweep_model::{ExportFormat, Table};
use sweep_report::{export_bytes, export_table, xlsx::SHEET_NAME};

fn cleaned() -> Table {
    Table::from_columns(vec![
        Series::new("id".into(), [Some(1i64), Some(2), Some(3)]).into_column(),
        Series::new("score".into(), [Some(1.0f64), None, Some(2.25)]).into_column(),
        Series::new("name".into(), [Some("ann"), Some("bo & co"), None]).into_column(),
    ])
    .expect("build table")
}

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("open workbook");
    let mut part = archive.by_name(name).expect("workbook part");
    let mut text = String::new();
    part.read_to_string(&mut text).expect("read part");
    text
}

#[test]
fn csv_export_has_header_and_no_index() {
    let bytes = export_bytes(&cleaned(), ExportFormat::Csv).expect("export csv");
    let text = String::from_utf8(bytes).expect("utf8");
    assert_eq!(text, "id,score,name\n1,1,ann\n2,,bo & co\n3,2.25,\n");
}

#[test]
fn xlsx_export_is_a_single_sheet_workbook() {
    let bytes = export_bytes(&cleaned(), ExportFormat::Excel).expect("export xlsx");
    assert_eq!(&bytes[..2], b"PK");

    let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).expect("open workbook");
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/_rels/workbook.xml.rels",
            "xl/workbook.xml",
            "xl/worksheets/sheet1.xml",
        ]
    );

    let workbook = read_part(&bytes, "xl/workbook.xml");
    assert!(workbook.contains(&format!(r#"name="{SHEET_NAME}""#)));

    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<c r="B1" t="inlineStr"><is><t>score</t></is></c>"#));
    assert!(sheet.contains(r#"<c r="B2"><v>1</v></c>"#));
    assert!(sheet.contains(r#"<c r="B4"><v>2.25</v></c>"#));
    assert!(sheet.contains("bo &amp; co"));
    assert!(!sheet.contains(r#"r="B3""#));
    assert!(!sheet.contains(r#"r="C4""#));
}

#[test]
fn export_table_names_file_after_stem() {
    let dir = TempDir::new().expect("temp dir");
    let out = dir.path().join("output");

    let csv = export_table(&cleaned(), ExportFormat::Csv, &out, "scores").expect("export");
    assert_eq!(csv, out.join("scores.csv"));
    assert!(csv.is_file());

    let xlsx = export_table(&cleaned(), ExportFormat::Excel, &out, "scores").expect("export");
    assert_eq!(xlsx.file_name().and_then(|n| n.to_str()), Some("scores.xlsx"));
    let bytes = std::fs::read(&xlsx).expect("read xlsx");
    assert!(read_part(&bytes, "xl/worksheets/sheet1.xml").contains("ann"));
}

#[test]
fn empty_projection_exports_empty_csv() {
    let table = Table::from_columns(Vec::new()).expect("empty table");
    let bytes = export_bytes(&table, ExportFormat::Csv).expect("export csv");
    assert!(bytes.is_empty());
}

#[test]
fn csv_export_snapshot() {
    let table = Table::from_columns(vec![
        Series::new("city".into(), [Some("Oslo"), Some("Lima, PE"), None]).into_column(),
        Series::new("temp".into(), [Some(-3.5f64), Some(19.0), Some(0.0)]).into_column(),
    ])
    .expect("build table");
    let bytes = export_bytes(&table, ExportFormat::Csv).expect("export csv");
    insta::assert_snapshot!(String::from_utf8(bytes).expect("utf8"), @r#"
    city,temp
    Oslo,-3.5
    "Lima, PE",19
    ,0
    "#);
}
