//! Shared XML helpers for the SVG and XLSX writers.

use std::io::Write;

use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

/// Write the `<?xml version="1.0" encoding="UTF-8"?>` declaration.
pub fn write_declaration<W: Write>(writer: &mut Writer<W>) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(())
}

/// Write a simple text element.
pub fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> Result<()> {
    let mut start = BytesStart::new(name);
    for attribute in attributes {
        start.push_attribute(*attribute);
    }
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write an element with attributes and no content.
pub fn write_empty_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<()> {
    let mut start = BytesStart::new(name);
    for attribute in attributes {
        start.push_attribute(*attribute);
    }
    writer.write_event(Event::Empty(start))?;
    Ok(())
}

pub fn start_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<()> {
    let mut start = BytesStart::new(name);
    for attribute in attributes {
        start.push_attribute(*attribute);
    }
    writer.write_event(Event::Start(start))?;
    Ok(())
}

pub fn end_element<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Spreadsheet column letters for a zero-based index: 0 is `A`, 26 is `AA`.
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index + 1;
    while remaining > 0 {
        let rem = (remaining - 1) % 26;
        letters.push(b'A' + rem as u8);
        remaining = (remaining - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// `A1`-style reference for zero-based column and row indices.
pub fn cell_reference(column: usize, row: usize) -> String {
    format!("{}{}", column_letter(column), row + 1)
}

/// Format a coordinate for SVG output with at most two decimals.
pub fn coord(value: f64) -> String {
    let text = format!("{value:.2}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_roll_over() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(51), "AZ");
        assert_eq!(column_letter(52), "BA");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn cell_reference_is_one_based_row() {
        assert_eq!(cell_reference(0, 0), "A1");
        assert_eq!(cell_reference(2, 9), "C10");
    }

    #[test]
    fn coord_trims_zeros() {
        assert_eq!(coord(10.0), "10");
        assert_eq!(coord(1.25), "1.25");
        assert_eq!(coord(1.5), "1.5");
        assert_eq!(coord(-0.001), "0");
    }

    #[test]
    fn text_element_escapes_content() {
        let mut writer = Writer::new(Vec::new());
        write_text_element(&mut writer, "t", &[("k", "v")], "a<b").unwrap();
        let xml = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(xml, r#"<t k="v">a&lt;b</t>"#);
    }
}
