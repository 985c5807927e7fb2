//! Single-sheet Excel workbook export.
//!
//! The workbook is a minimal Office Open XML package: content types, package
//! relationships, a workbook with one sheet named `Sheet1` and the sheet
//! itself. Strings are stored inline so no shared string table is needed.

use std::io::{Seek, Write};

use anyhow::{Context, Result};
use polars::prelude::AnyValue;
use quick_xml::Writer;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use sweep_common::{any_to_f64, any_to_string};
use sweep_model::{ColumnKind, Table};

use crate::common::{
    cell_reference, end_element, start_element, write_declaration, write_empty_element,
    write_text_element,
};

pub const SHEET_NAME: &str = "Sheet1";

const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const PACKAGE_RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const DOC_RELS_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const WORKBOOK_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const WORKSHEET_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const RELS_CONTENT_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";

/// Write `table` as an `.xlsx` workbook with a header row and no index column.
pub fn write_xlsx<W: Write + Seek>(table: &Table, out: W) -> Result<W> {
    let mut zip = ZipWriter::new(out);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let parts: [(&str, Vec<u8>); 5] = [
        ("[Content_Types].xml", content_types()?),
        ("_rels/.rels", package_rels()?),
        ("xl/workbook.xml", workbook()?),
        ("xl/_rels/workbook.xml.rels", workbook_rels()?),
        ("xl/worksheets/sheet1.xml", worksheet(table)?),
    ];
    for (name, bytes) in parts {
        zip.start_file(name, options)
            .with_context(|| format!("start workbook part {name}"))?;
        zip.write_all(&bytes)
            .with_context(|| format!("write workbook part {name}"))?;
    }
    let out = zip.finish().context("finish workbook archive")?;
    Ok(out)
}

fn content_types() -> Result<Vec<u8>> {
    let mut xml = Writer::new(Vec::new());
    write_declaration(&mut xml)?;
    start_element(&mut xml, "Types", &[("xmlns", CONTENT_TYPES_NS)])?;
    write_empty_element(
        &mut xml,
        "Default",
        &[("Extension", "rels"), ("ContentType", RELS_CONTENT_TYPE)],
    )?;
    write_empty_element(
        &mut xml,
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    write_empty_element(
        &mut xml,
        "Override",
        &[
            ("PartName", "/xl/workbook.xml"),
            ("ContentType", WORKBOOK_CONTENT_TYPE),
        ],
    )?;
    write_empty_element(
        &mut xml,
        "Override",
        &[
            ("PartName", "/xl/worksheets/sheet1.xml"),
            ("ContentType", WORKSHEET_CONTENT_TYPE),
        ],
    )?;
    end_element(&mut xml, "Types")?;
    Ok(xml.into_inner())
}

fn package_rels() -> Result<Vec<u8>> {
    let mut xml = Writer::new(Vec::new());
    write_declaration(&mut xml)?;
    start_element(&mut xml, "Relationships", &[("xmlns", PACKAGE_RELS_NS)])?;
    write_empty_element(
        &mut xml,
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", OFFICE_DOCUMENT_REL),
            ("Target", "xl/workbook.xml"),
        ],
    )?;
    end_element(&mut xml, "Relationships")?;
    Ok(xml.into_inner())
}

fn workbook() -> Result<Vec<u8>> {
    let mut xml = Writer::new(Vec::new());
    write_declaration(&mut xml)?;
    start_element(
        &mut xml,
        "workbook",
        &[("xmlns", SPREADSHEET_NS), ("xmlns:r", DOC_RELS_NS)],
    )?;
    start_element(&mut xml, "sheets", &[])?;
    write_empty_element(
        &mut xml,
        "sheet",
        &[("name", SHEET_NAME), ("sheetId", "1"), ("r:id", "rId1")],
    )?;
    end_element(&mut xml, "sheets")?;
    end_element(&mut xml, "workbook")?;
    Ok(xml.into_inner())
}

fn workbook_rels() -> Result<Vec<u8>> {
    let mut xml = Writer::new(Vec::new());
    write_declaration(&mut xml)?;
    start_element(&mut xml, "Relationships", &[("xmlns", PACKAGE_RELS_NS)])?;
    write_empty_element(
        &mut xml,
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", WORKSHEET_REL),
            ("Target", "worksheets/sheet1.xml"),
        ],
    )?;
    end_element(&mut xml, "Relationships")?;
    Ok(xml.into_inner())
}

fn worksheet(table: &Table) -> Result<Vec<u8>> {
    let mut xml = Writer::new(Vec::new());
    write_declaration(&mut xml)?;
    start_element(&mut xml, "worksheet", &[("xmlns", SPREADSHEET_NS)])?;
    if table.width() == 0 {
        write_empty_element(&mut xml, "sheetData", &[])?;
        end_element(&mut xml, "worksheet")?;
        return Ok(xml.into_inner());
    }
    start_element(&mut xml, "sheetData", &[])?;

    let header_row = "1".to_string();
    start_element(&mut xml, "row", &[("r", header_row.as_str())])?;
    for (col, name) in table.column_names().iter().enumerate() {
        write_string_cell(&mut xml, &cell_reference(col, 0), name)?;
    }
    end_element(&mut xml, "row")?;

    for row in 0..table.height() {
        let row_number = (row + 2).to_string();
        start_element(&mut xml, "row", &[("r", row_number.as_str())])?;
        for (col, (column, kind)) in table.columns().enumerate() {
            let value = column
                .get(row)
                .with_context(|| format!("read {} row {}", column.name(), row + 1))?;
            if matches!(value, AnyValue::Null) {
                continue;
            }
            let reference = cell_reference(col, row + 1);
            match kind {
                ColumnKind::Integer | ColumnKind::Float => match any_to_f64(value.clone()) {
                    Some(number) if number.is_finite() => {
                        start_element(&mut xml, "c", &[("r", reference.as_str())])?;
                        write_text_element(&mut xml, "v", &[], &any_to_string(value))?;
                        end_element(&mut xml, "c")?;
                    }
                    _ => write_string_cell(&mut xml, &reference, &any_to_string(value))?,
                },
                ColumnKind::Text => write_string_cell(&mut xml, &reference, &any_to_string(value))?,
            }
        }
        end_element(&mut xml, "row")?;
    }

    end_element(&mut xml, "sheetData")?;
    end_element(&mut xml, "worksheet")?;
    Ok(xml.into_inner())
}

fn write_string_cell<W: Write>(xml: &mut Writer<W>, reference: &str, text: &str) -> Result<()> {
    start_element(xml, "c", &[("r", reference), ("t", "inlineStr")])?;
    start_element(xml, "is", &[])?;
    if text.trim() != text {
        write_text_element(xml, "t", &[("xml:space", "preserve")], text)?;
    } else {
        write_text_element(xml, "t", &[], text)?;
    }
    end_element(xml, "is")?;
    end_element(xml, "c")?;
    Ok(())
}
