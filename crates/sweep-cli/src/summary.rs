use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::AnyValue;

use sweep_common::{any_to_string, format_numeric};
use sweep_model::Table as DataTable;
use sweep_report::{ChartSet, Visualization};
use sweep_transform::CleaningReport;

use crate::types::{CleanResult, ColumnProfile, InspectResult};

/// Placeholder shown for missing cells.
pub const MISSING_MARKER: &str = "null";

pub fn print_inspect(result: &InspectResult) -> Result<()> {
    println!("File: {}", result.file_name);
    println!("Rows: {}  Columns: {}", result.rows, result.columns.len());
    println!();
    println!("Data preview");
    println!("{}", preview_table(&result.preview)?);
    println!("{}", columns_table(&result.columns));
    Ok(())
}

pub fn print_clean_summary(result: &CleanResult) -> Result<()> {
    println!("File: {}", result.file_name);
    println!(
        "Raw: {} rows x {} columns",
        result.raw_rows, result.raw_columns
    );
    println!();
    println!("Data preview");
    println!("{}", preview_table(&result.preview)?);
    println!("Cleaning");
    println!("{}", report_table(&result.report));
    for column in &result.report.unfilled_columns {
        eprintln!("warning: column {column} has no values to average; left missing");
    }
    println!(
        "Cleaned data ({} rows x {} columns)",
        result.cleaned.height(),
        result.cleaned.width()
    );
    let shown = cleaned_rows(result);
    println!("{}", preview_table(&shown)?);
    if result.cleaned.height() > shown.height() {
        println!("... {} more rows", result.cleaned.height() - shown.height());
    }
    print_visualization(result);
    match &result.export_path {
        Some(path) => println!("Exported {} to {}", result.format, path.display()),
        None => println!(
            "Dry run: {} export {} not written",
            result.format, result.download_name
        ),
    }
    Ok(())
}

/// Rows of the cleaned table to print: all of them unless `show_rows` caps it.
pub fn cleaned_rows(result: &CleanResult) -> DataTable {
    match result.show_rows {
        Some(limit) => result.cleaned.head(limit),
        None => result.cleaned.clone(),
    }
}

fn print_visualization(result: &CleanResult) {
    println!();
    match &result.visualization {
        Visualization::Skipped { warning } => eprintln!("warning: {warning}"),
        Visualization::Charts(charts) => {
            println!("Numeric columns: {}", result.numeric_columns.join(", "));
            if let Some(message) = &charts.axis_message {
                eprintln!("error: {message}");
            }
            println!("{}", chart_table(charts));
            for path in &result.chart_files {
                println!("Chart: {}", path.display());
            }
        }
    }
}

/// Render a table of cells, missing cells shown as [`MISSING_MARKER`].
pub fn preview_table(data: &DataTable) -> Result<Table> {
    let mut table = Table::new();
    table.set_header(
        data.column_names()
            .iter()
            .map(|name| header_cell(name))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for row in 0..data.height() {
        let mut cells = Vec::with_capacity(data.width());
        for (column, kind) in data.columns() {
            let value = column
                .get(row)
                .with_context(|| format!("read {} row {}", column.name(), row + 1))?;
            let cell = if matches!(value, AnyValue::Null) {
                dim_cell(MISSING_MARKER)
            } else if kind.is_numeric() {
                Cell::new(any_to_string(value)).set_alignment(CellAlignment::Right)
            } else {
                Cell::new(any_to_string(value))
            };
            cells.push(cell);
        }
        table.add_row(cells);
    }
    Ok(table)
}

pub fn columns_table(columns: &[ColumnProfile]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Missing"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in columns {
        let kind = Cell::new(column.kind);
        let kind = if column.kind.is_numeric() {
            kind.fg(Color::Blue)
        } else {
            kind
        };
        table.add_row(vec![
            Cell::new(&column.name),
            kind,
            count_cell(column.missing, Color::Yellow),
        ]);
    }
    table
}

pub fn report_table(report: &CleaningReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Step"), header_cell("Result")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let dedupe = if report.remove_duplicates {
        Cell::new(format!("{} removed", report.duplicates_removed))
    } else {
        dim_cell("off")
    };
    table.add_row(vec![Cell::new("Missing values"), Cell::new(report.policy.label())]);
    table.add_row(vec![
        Cell::new("Rows with missing removed"),
        count_cell(report.rows_with_missing_removed, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Cells filled"),
        Cell::new(report.cells_filled),
    ]);
    table.add_row(vec![Cell::new("Duplicate rows"), dedupe]);
    table.add_row(vec![
        Cell::new("Rows").add_attribute(Attribute::Bold),
        Cell::new(format!("{} -> {}", report.rows_in, report.rows_out))
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Columns").add_attribute(Attribute::Bold),
        Cell::new(format!("{} -> {}", report.columns_in, report.columns_out))
            .add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn chart_table(charts: &ChartSet) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Chart"), header_cell("Summary")]);
    apply_table_style(&mut table);
    let scatter = match &charts.scatter {
        Some(series) => Cell::new(format!(
            "{} vs {}: {} points",
            series.x_label,
            series.y_label,
            series.points.len()
        )),
        None => Cell::new("skipped").fg(Color::Red),
    };
    table.add_row(vec![Cell::new("Scatter"), scatter]);

    let histogram = &charts.histogram;
    let range = match (histogram.edges.first(), histogram.edges.last()) {
        (Some(lo), Some(hi)) => format!("[{}, {}]", format_numeric(*lo), format_numeric(*hi)),
        _ => "no values".to_string(),
    };
    table.add_row(vec![
        Cell::new(format!("Histogram of {}", histogram.column)),
        Cell::new(format!(
            "{} bins over {range}, {} values",
            histogram.counts.len(),
            histogram.total()
        )),
    ]);

    let box_plot = match &charts.box_plot {
        Some(plot) => Cell::new(format!(
            "median {}, IQR [{}, {}], {} outliers",
            format_numeric(plot.median),
            format_numeric(plot.q1),
            format_numeric(plot.q3),
            plot.outliers.len()
        )),
        None => dim_cell("no values"),
    };
    table.add_row(vec![
        Cell::new(format!("Boxplot of {}", charts.axes.x)),
        box_plot,
    ]);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(label: &str) -> Cell {
    Cell::new(label).fg(Color::DarkGrey)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell("0")
    } else {
        Cell::new(count).fg(color)
    }
}
