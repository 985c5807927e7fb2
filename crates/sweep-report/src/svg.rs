//! Standalone SVG rendering of chart data.
//!
//! Every chart is a fixed 640x480 document with a title, labelled axes and
//! five ticks per numeric axis.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::Writer;
use tracing::info;

use sweep_common::format_numeric;

use crate::chart::{BoxPlot, ChartSet, Histogram, ScatterSeries};
use crate::common::{coord, end_element, start_element, write_empty_element, write_text_element};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TICKS: usize = 5;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const SCATTER_COLOR: &str = "#1f77b4";
const HISTOGRAM_FILL: &str = "skyblue";
const BOX_FILL: &str = "lightgreen";
const EDGE_COLOR: &str = "black";

/// Maps a data interval onto a pixel interval.
#[derive(Debug, Clone, Copy)]
struct Scale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl Scale {
    fn new(lo: f64, hi: f64, range: (f64, f64)) -> Self {
        let domain = if lo < hi {
            (lo, hi)
        } else if lo == hi && lo.is_finite() {
            (lo - 0.5, hi + 0.5)
        } else {
            (0.0, 1.0)
        };
        Self { domain, range }
    }

    fn map(self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    fn ticks(self) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let step = (d1 - d0) / (TICKS - 1) as f64;
        (0..TICKS).map(|idx| d0 + step * idx as f64).collect()
    }
}

fn x_range() -> (f64, f64) {
    (MARGIN_LEFT, WIDTH - MARGIN_RIGHT)
}

fn y_range() -> (f64, f64) {
    (HEIGHT - MARGIN_BOTTOM, MARGIN_TOP)
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn tick_label(value: f64) -> String {
    format_numeric((value * 100.0).round() / 100.0)
}

fn begin_document<W: Write>(xml: &mut Writer<W>, title: &str) -> Result<()> {
    let width = coord(WIDTH);
    let height = coord(HEIGHT);
    let view_box = format!("0 0 {width} {height}");
    start_element(
        xml,
        "svg",
        &[
            ("xmlns", SVG_NS),
            ("width", width.as_str()),
            ("height", height.as_str()),
            ("viewBox", view_box.as_str()),
            ("font-family", "sans-serif"),
        ],
    )?;
    write_empty_element(
        xml,
        "rect",
        &[("width", "100%"), ("height", "100%"), ("fill", "white")],
    )?;
    let center = coord(WIDTH / 2.0);
    write_text_element(
        xml,
        "text",
        &[
            ("x", center.as_str()),
            ("y", "24"),
            ("text-anchor", "middle"),
            ("font-size", "16"),
        ],
        title,
    )?;
    Ok(())
}

fn line<W: Write>(xml: &mut Writer<W>, from: (f64, f64), to: (f64, f64)) -> Result<()> {
    let (x1, y1, x2, y2) = (coord(from.0), coord(from.1), coord(to.0), coord(to.1));
    write_empty_element(
        xml,
        "line",
        &[
            ("x1", x1.as_str()),
            ("y1", y1.as_str()),
            ("x2", x2.as_str()),
            ("y2", y2.as_str()),
            ("stroke", EDGE_COLOR),
        ],
    )
}

fn rect<W: Write>(
    xml: &mut Writer<W>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    fill: &str,
) -> Result<()> {
    let (x, y, width, height) = (coord(x), coord(y), coord(width), coord(height));
    write_empty_element(
        xml,
        "rect",
        &[
            ("x", x.as_str()),
            ("y", y.as_str()),
            ("width", width.as_str()),
            ("height", height.as_str()),
            ("fill", fill),
            ("stroke", EDGE_COLOR),
        ],
    )
}

fn circle<W: Write>(xml: &mut Writer<W>, cx: f64, cy: f64, fill: &str) -> Result<()> {
    let (cx, cy) = (coord(cx), coord(cy));
    write_empty_element(
        xml,
        "circle",
        &[("cx", cx.as_str()), ("cy", cy.as_str()), ("r", "3"), ("fill", fill)],
    )
}

fn label<W: Write>(xml: &mut Writer<W>, x: f64, y: f64, anchor: &str, text: &str) -> Result<()> {
    let (x, y) = (coord(x), coord(y));
    write_text_element(
        xml,
        "text",
        &[
            ("x", x.as_str()),
            ("y", y.as_str()),
            ("text-anchor", anchor),
            ("font-size", "11"),
        ],
        text,
    )
}

fn x_axis<W: Write>(xml: &mut Writer<W>, scale: Option<Scale>, title: &str) -> Result<()> {
    let baseline = HEIGHT - MARGIN_BOTTOM;
    line(xml, (MARGIN_LEFT, baseline), (WIDTH - MARGIN_RIGHT, baseline))?;
    if let Some(scale) = scale {
        for tick in scale.ticks() {
            let x = scale.map(tick);
            line(xml, (x, baseline), (x, baseline + 5.0))?;
            label(xml, x, baseline + 18.0, "middle", &tick_label(tick))?;
        }
    }
    label(xml, WIDTH / 2.0, HEIGHT - 15.0, "middle", title)
}

fn y_axis<W: Write>(xml: &mut Writer<W>, scale: Option<Scale>, title: &str) -> Result<()> {
    line(xml, (MARGIN_LEFT, MARGIN_TOP), (MARGIN_LEFT, HEIGHT - MARGIN_BOTTOM))?;
    if let Some(scale) = scale {
        for tick in scale.ticks() {
            let y = scale.map(tick);
            line(xml, (MARGIN_LEFT - 5.0, y), (MARGIN_LEFT, y))?;
            label(xml, MARGIN_LEFT - 8.0, y + 4.0, "end", &tick_label(tick))?;
        }
    }
    let mid = coord((MARGIN_TOP + HEIGHT - MARGIN_BOTTOM) / 2.0);
    let rotate = format!("rotate(-90 16 {mid})");
    write_text_element(
        xml,
        "text",
        &[
            ("x", "16"),
            ("y", mid.as_str()),
            ("text-anchor", "middle"),
            ("font-size", "12"),
            ("transform", rotate.as_str()),
        ],
        title,
    )
}

fn finish(mut xml: Writer<Vec<u8>>) -> Result<Vec<u8>> {
    end_element(&mut xml, "svg")?;
    Ok(xml.into_inner())
}

/// Scatter plot of `series`, X against Y.
pub fn render_scatter(series: &ScatterSeries) -> Result<Vec<u8>> {
    let mut xml = Writer::new(Vec::new());
    let title = format!("Scatter plot of {} vs {}", series.x_label, series.y_label);
    begin_document(&mut xml, &title)?;

    let (x_lo, x_hi) = bounds(series.points.iter().map(|point| point.0));
    let (y_lo, y_hi) = bounds(series.points.iter().map(|point| point.1));
    let scales = (!series.points.is_empty()).then(|| {
        (
            Scale::new(x_lo, x_hi, x_range()),
            Scale::new(y_lo, y_hi, y_range()),
        )
    });
    x_axis(&mut xml, scales.map(|s| s.0), &series.x_label)?;
    y_axis(&mut xml, scales.map(|s| s.1), &series.y_label)?;
    if let Some((x_scale, y_scale)) = scales {
        for (x, y) in &series.points {
            circle(&mut xml, x_scale.map(*x), y_scale.map(*y), SCATTER_COLOR)?;
        }
    }
    finish(xml)
}

/// Histogram bars with frequency on the Y axis.
pub fn render_histogram(histogram: &Histogram) -> Result<Vec<u8>> {
    let mut xml = Writer::new(Vec::new());
    begin_document(&mut xml, &format!("Histogram of {}", histogram.column))?;

    let (Some(first), Some(last)) = (histogram.edges.first(), histogram.edges.last()) else {
        x_axis(&mut xml, None, &histogram.column)?;
        y_axis(&mut xml, None, "Frequency")?;
        return finish(xml);
    };
    let peak = histogram.counts.iter().copied().max().unwrap_or(0).max(1);
    let x_scale = Scale::new(*first, *last, x_range());
    let y_scale = Scale::new(0.0, peak as f64, y_range());
    x_axis(&mut xml, Some(x_scale), &histogram.column)?;
    y_axis(&mut xml, Some(y_scale), "Frequency")?;

    let baseline = y_scale.map(0.0);
    for (idx, count) in histogram.counts.iter().enumerate() {
        let left = x_scale.map(histogram.edges[idx]);
        let right = x_scale.map(histogram.edges[idx + 1]);
        let top = y_scale.map(*count as f64);
        rect(&mut xml, left, top, right - left, baseline - top, HISTOGRAM_FILL)?;
    }
    finish(xml)
}

/// Horizontal box-and-whisker plot.
pub fn render_box_plot(plot: &BoxPlot) -> Result<Vec<u8>> {
    let mut xml = Writer::new(Vec::new());
    begin_document(&mut xml, &format!("Boxplot of {}", plot.column))?;

    let (lo, hi) = bounds(
        [plot.lower_whisker, plot.upper_whisker]
            .into_iter()
            .chain(plot.outliers.iter().copied()),
    );
    let scale = Scale::new(lo, hi, x_range());
    x_axis(&mut xml, Some(scale), &plot.column)?;

    let center = (MARGIN_TOP + HEIGHT - MARGIN_BOTTOM) / 2.0;
    let half = 60.0;
    let (left, right) = (scale.map(plot.q1), scale.map(plot.q3));
    line(&mut xml, (scale.map(plot.lower_whisker), center), (left, center))?;
    line(&mut xml, (right, center), (scale.map(plot.upper_whisker), center))?;
    for whisker in [plot.lower_whisker, plot.upper_whisker] {
        let x = scale.map(whisker);
        line(&mut xml, (x, center - half / 2.0), (x, center + half / 2.0))?;
    }
    rect(&mut xml, left, center - half, right - left, half * 2.0, BOX_FILL)?;
    let median = scale.map(plot.median);
    line(&mut xml, (median, center - half), (median, center + half))?;
    for outlier in &plot.outliers {
        circle(&mut xml, scale.map(*outlier), center, EDGE_COLOR)?;
    }
    finish(xml)
}

/// Write every chart in `charts` to `dir` as `.svg` files.
pub fn write_chart_files(dir: &Path, charts: &ChartSet) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut documents = Vec::new();
    if let Some(scatter) = &charts.scatter {
        documents.push(("scatter.svg", render_scatter(scatter)?));
    }
    documents.push(("histogram.svg", render_histogram(&charts.histogram)?));
    if let Some(plot) = &charts.box_plot {
        documents.push(("boxplot.svg", render_box_plot(plot)?));
    }

    let mut written = Vec::with_capacity(documents.len());
    for (name, bytes) in documents {
        let path = dir.join(name);
        fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "wrote chart");
        written.push(path);
    }
    Ok(written)
}
