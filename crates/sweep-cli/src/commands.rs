use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use sweep_ingest::load_csv_file;
use sweep_report::{Visualization, build_visualization, export_table, write_chart_files};
use sweep_transform::Session;

use crate::types::{CleanRequest, CleanResult, ColumnProfile, InspectRequest, InspectResult};

/// Directory the export lands in when none is given: `<file dir>/output`.
pub fn default_output_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join("output"),
        _ => PathBuf::from("output"),
    }
}

pub fn run_inspect(request: &InspectRequest) -> Result<InspectResult> {
    let span = info_span!("inspect", file = %request.file.display());
    let _guard = span.enter();

    let loaded = load_csv_file(&request.file, &request.ingest)?;
    let table = &loaded.table;
    let columns = table
        .columns()
        .map(|(column, kind)| ColumnProfile {
            name: column.name().to_string(),
            kind,
            missing: column.null_count(),
        })
        .collect();
    Ok(InspectResult {
        file_name: loaded.name.clone(),
        rows: table.height(),
        preview: table.head(request.preview_rows),
        columns,
    })
}

pub fn run_clean(request: &CleanRequest) -> Result<CleanResult> {
    let file = &request.file;
    let span = info_span!("clean", file = %file.display());
    let _guard = span.enter();

    // =========================================================================
    // Stage 1: Load
    // =========================================================================
    let load_start = Instant::now();
    let loaded = info_span!("load").in_scope(|| load_csv_file(file, &request.ingest))?;
    let mut session = Session::new(loaded);
    let raw_rows = session.raw().height();
    let raw_columns = session.raw().width();
    let preview = session.preview(request.preview_rows);
    debug!(elapsed_ms = load_start.elapsed().as_millis(), "load finished");

    // =========================================================================
    // Stage 2: Clean
    // =========================================================================
    let clean_start = Instant::now();
    let file_name = session.file_name().to_string();
    let outcome = info_span!("pipeline", policy = %request.cleaning.missing)
        .in_scope(|| session.clean(&request.cleaning).cloned())
        .with_context(|| format!("clean {file_name}"))?;
    info!(
        rows_in = outcome.report.rows_in,
        rows_out = outcome.report.rows_out,
        columns_out = outcome.report.columns_out,
        elapsed_ms = clean_start.elapsed().as_millis(),
        "cleaning finished"
    );
    let numeric_columns = session.numeric_columns();

    // =========================================================================
    // Stage 3: Visualize
    // =========================================================================
    let visualization = info_span!("visualize").in_scope(|| {
        build_visualization(
            &outcome.table,
            request.x.as_deref(),
            request.y.as_deref(),
            request.bins,
        )
    });
    let visualization = match visualization {
        Ok(visualization) => visualization,
        Err(error) => {
            warn!(%error, "charts skipped");
            Visualization::Skipped {
                warning: format!("charts skipped: {error}"),
            }
        }
    };
    let mut chart_files = Vec::new();
    if let (Some(dir), Visualization::Charts(charts)) = (&request.charts_dir, &visualization) {
        if request.dry_run {
            info!(dir = %dir.display(), "dry run, charts not written");
        } else {
            chart_files = write_chart_files(dir, charts)?;
        }
    }

    // =========================================================================
    // Stage 4: Export
    // =========================================================================
    let download_name = session.download_name(request.format);
    let export_path = if request.dry_run {
        info!(file = %download_name, "dry run, export skipped");
        None
    } else {
        let dir = request
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(file));
        let path = info_span!("export", format = %request.format)
            .in_scope(|| export_table(&outcome.table, request.format, &dir, session.stem()))
            .with_context(|| format!("export {download_name}"))?;
        Some(path)
    };
    if outcome.table.is_empty() {
        warn!("cleaned table has no rows");
    }

    Ok(CleanResult {
        file_name,
        raw_rows,
        raw_columns,
        preview,
        report: outcome.report,
        cleaned: outcome.table,
        numeric_columns,
        visualization,
        chart_files,
        format: request.format,
        download_name,
        export_path,
        show_rows: request.show_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dir_sits_next_to_input() {
        assert_eq!(
            default_output_dir(Path::new("data/scores.csv")),
            PathBuf::from("data/output")
        );
        assert_eq!(
            default_output_dir(Path::new("scores.csv")),
            PathBuf::from("output")
        );
    }
}
