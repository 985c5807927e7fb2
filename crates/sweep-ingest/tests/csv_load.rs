use std::fs;
use std::path::PathBuf;

use polars::prelude::AnyValue;
use tempfile::TempDir;

use sweep_ingest::{IngestOptions, load_csv_bytes, load_csv_file};
use sweep_model::ColumnKind;

fn temp_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn loads_header_and_infers_kinds() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "people.csv", "id,score,name\n1,2.5,ann\n2,,bo\n3,4,\n");

    let loaded = load_csv_file(&path, &IngestOptions::default()).expect("load csv");

    assert_eq!(loaded.name, "people.csv");
    assert_eq!(loaded.stem, "people");
    let table = &loaded.table;
    assert_eq!(table.column_names(), vec!["id", "score", "name"]);
    assert_eq!(
        table.kinds(),
        &[ColumnKind::Integer, ColumnKind::Float, ColumnKind::Text]
    );
    assert_eq!(table.height(), 3);
    assert_eq!(table.get("score", 1).unwrap(), AnyValue::Null);
    assert_eq!(table.get("name", 2).unwrap(), AnyValue::Null);
    assert_eq!(table.missing_count(), 2);
}

#[test]
fn normalizes_header_whitespace() {
    let loaded = load_csv_bytes(
        b" unit   price ,qty\n1.5,2\n".to_vec(),
        "orders.v1.csv",
        &IngestOptions::default(),
    )
    .expect("load csv");

    assert_eq!(loaded.table.column_names(), vec!["unit price", "qty"]);
    assert_eq!(loaded.stem, "orders");
}

#[test]
fn honours_custom_separator() {
    let options = IngestOptions::default().with_separator(b';');
    let loaded = load_csv_bytes(b"a;b\n1;x\n".to_vec(), "semi.csv", &options).expect("load csv");

    assert_eq!(loaded.table.column_names(), vec!["a", "b"]);
    assert_eq!(loaded.table.kind("a"), Some(ColumnKind::Integer));
    assert_eq!(loaded.table.kind("b"), Some(ColumnKind::Text));
}

#[test]
fn boolean_columns_become_text() {
    let loaded = load_csv_bytes(
        b"flag,n\ntrue,1\nfalse,2\n".to_vec(),
        "flags.csv",
        &IngestOptions::default(),
    )
    .expect("load csv");

    assert_eq!(loaded.table.kind("flag"), Some(ColumnKind::Text));
    assert_eq!(
        loaded.table.get("flag", 0).unwrap(),
        AnyValue::String("true")
    );
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let err = load_csv_file(&dir.path().join("absent.csv"), &IngestOptions::default())
        .expect_err("missing file must fail");
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn empty_upload_is_an_error() {
    assert!(load_csv_bytes(Vec::new(), "empty.csv", &IngestOptions::default()).is_err());
    assert!(load_csv_bytes(b"\n  \n".to_vec(), "blank.csv", &IngestOptions::default()).is_err());
}

#[test]
fn late_text_value_makes_a_text_column() {
    let mut contents = String::from("id,code\n");
    for row in 0..150 {
        contents.push_str(&format!("{row},{row}\n"));
    }
    contents.push_str("150,A12\n");

    let loaded =
        load_csv_bytes(contents.into_bytes(), "late.csv", &IngestOptions::default()).expect("load csv");

    assert_eq!(loaded.table.height(), 151);
    assert_eq!(loaded.table.kind("id"), Some(ColumnKind::Integer));
    assert_eq!(loaded.table.kind("code"), Some(ColumnKind::Text));
    assert_eq!(loaded.table.get("code", 150).unwrap(), AnyValue::String("A12"));
}

#[test]
fn header_only_file_keeps_text_columns() {
    let loaded =
        load_csv_bytes(b"a,b\n".to_vec(), "header.csv", &IngestOptions::default()).expect("load csv");
    assert_eq!(loaded.table.height(), 0);
    assert_eq!(loaded.table.kinds(), &[ColumnKind::Text, ColumnKind::Text]);
}

#[test]
fn missing_markers_read_as_missing() {
    let loaded = load_csv_bytes(
        b"a,b\n1,2\nNA,3\nnan,4\n".to_vec(),
        "markers.csv",
        &IngestOptions::default(),
    )
    .expect("load csv");
    let table = &loaded.table;
    assert_eq!(table.kind("a"), Some(ColumnKind::Integer));
    assert_eq!(table.column("a").unwrap().null_count(), 2);
    assert_eq!(table.get("b", 1).unwrap(), AnyValue::Int64(3));
}

#[test]
fn empty_column_is_read_as_float() {
    let loaded =
        load_csv_bytes(b"a,b
1,
2,
".to_vec(), "blank.csv", &IngestOptions::default())
            .expect("load csv");
    assert_eq!(loaded.table.kind("a"), Some(ColumnKind::Integer));
    assert_eq!(loaded.table.kind("b"), Some(ColumnKind::Float));
    assert_eq!(loaded.table.missing_count(), 2);
}

#[test]
fn null_markers_can_be_turned_off() {
    let options = IngestOptions::default().with_null_values(Vec::new());
    let loaded = load_csv_bytes(b"a\n1\nNA\n".to_vec(), "raw.csv", &options).expect("load csv");
    assert_eq!(loaded.table.kind("a"), Some(ColumnKind::Text));
    assert_eq!(loaded.table.missing_count(), 0);
}
