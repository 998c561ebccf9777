//! Chart selection and rendering.
//!
//! [`select_chart`] turns a group into a [`ChartSpec`], a plain description
//! of what to draw. [`render_chart`] rasterizes a spec with a [`Style`].
//! Keeping the two apart lets the selection rules be checked without pixels.

use crate::classify::ChartFamily;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::group::{Group, GroupingMode};
use crate::plots::{BoxPlot, Frame, LegendEntry, LineChart, LineSeries};
use crate::record::BenchmarkRecord;
use crate::scale::AxisScale;
use crate::theme::Style;
use trueno::Vector;

/// Legend title for every chart.
pub const LEGEND_TITLE: &str = "Database";

/// Numeric field plotted along the x axis of a trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XDimension {
    /// Dataset size multiplier.
    Scale,
    /// Entities involved in the call.
    EntityCount,
}

impl XDimension {
    /// Axis label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scale => "Scale (data multiplier)",
            Self::EntityCount => "Entity count",
        }
    }

    fn value(self, record: &BenchmarkRecord) -> f64 {
        match self {
            Self::Scale => record.scale(),
            Self::EntityCount => record.entity_count(),
        }
    }
}

/// Mean duration at one x position.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    /// Position along the x dimension.
    pub x: f64,
    /// Mean elapsed time in milliseconds.
    pub mean_ms: f32,
    /// Number of measurements averaged.
    pub count: usize,
}

/// One database's line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    /// Database name.
    pub database: String,
    /// Points sorted by x.
    pub points: Vec<TrendPoint>,
}

/// Measurements for one box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    /// Scale category.
    pub scale: f64,
    /// Database name.
    pub database: String,
    /// Elapsed times in milliseconds, input order.
    pub values_ms: Vec<f32>,
}

/// Data drawn by a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    /// Mean-per-x line per database.
    Trend {
        /// Field on the x axis.
        x_dimension: XDimension,
        /// One series per database, first-seen order.
        series: Vec<TrendSeries>,
    },
    /// Box per (scale, database).
    Distribution {
        /// Sorted distinct scales.
        categories: Vec<f64>,
        /// Databases in first-seen order.
        databases: Vec<String>,
        /// Non-empty boxes, by category then database.
        boxes: Vec<BoxGroup>,
    },
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Chart title.
    pub title: String,
    /// X-axis label.
    pub x_label: String,
    /// Y-axis label.
    pub y_label: String,
    /// Y-axis transform.
    pub y_scale: AxisScale,
    /// Legend title.
    pub legend_title: String,
    /// Data to draw.
    pub kind: ChartKind,
}

impl ChartSpec {
    /// Database names in legend order.
    #[must_use]
    pub fn databases(&self) -> Vec<&str> {
        match &self.kind {
            ChartKind::Trend { series, .. } => series.iter().map(|s| s.database.as_str()).collect(),
            ChartKind::Distribution { databases, .. } => databases.iter().map(String::as_str).collect(),
        }
    }
}

/// Describe the chart for a group.
///
/// # Errors
///
/// Returns [`Error::UnsupportedChartFamily`] if the group's family does not
/// match its operation, and [`Error::EmptyData`] for a group without records.
pub fn select_chart(group: &Group<'_>) -> Result<ChartSpec> {
    if group.operation.family() != group.family {
        return Err(Error::UnsupportedChartFamily(format!(
            "{} (grouped as {}, classified as {})",
            group.key.operation,
            group.family,
            group.operation.family()
        )));
    }
    if group.records.is_empty() {
        return Err(Error::EmptyData);
    }

    let mode = group.mode();
    let operation = &group.key.operation;
    let title = match &group.key.entity_type {
        None => format!("Operation: {operation} - mean time by scale (all entities)"),
        Some(entity) => format!("Operation: {operation} - entity: {entity}"),
    };
    let y_scale = if group.operation.is_delete_all() {
        AxisScale::Log
    } else {
        AxisScale::Linear
    };

    let (x_label, y_label, kind) = match group.family {
        ChartFamily::Batch => {
            let x_dimension = match mode {
                GroupingMode::PerEntity => XDimension::EntityCount,
                GroupingMode::Global | GroupingMode::Both => XDimension::Scale,
            };
            let series = trend_series(&group.records, x_dimension);
            (
                x_dimension.label(),
                "Mean time (ms)",
                ChartKind::Trend { x_dimension, series },
            )
        }
        ChartFamily::Single => (
            XDimension::Scale.label(),
            "Time (ms)",
            distribution(&group.records),
        ),
    };

    Ok(ChartSpec {
        title,
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        y_scale,
        legend_title: LEGEND_TITLE.to_string(),
        kind,
    })
}

/// Databases in first-seen order.
fn databases(records: &[&BenchmarkRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for r in records {
        if !seen.iter().any(|d| *d == r.database) {
            seen.push(r.database.clone());
        }
    }
    seen
}

fn mean(values: Vec<f32>) -> f32 {
    Vector::from_vec(values).mean().unwrap_or(0.0)
}

fn trend_series(records: &[&BenchmarkRecord], x_dimension: XDimension) -> Vec<TrendSeries> {
    databases(records)
        .into_iter()
        .map(|database| {
            let mut samples: Vec<(f64, f32)> = records
                .iter()
                .filter(|r| r.database == database)
                .map(|r| (x_dimension.value(r), r.elapsed_millis() as f32))
                .collect();
            samples.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut points = Vec::new();
            let mut start = 0;
            while start < samples.len() {
                let x = samples[start].0;
                let end = samples[start..]
                    .iter()
                    .position(|s| s.0 != x)
                    .map_or(samples.len(), |offset| start + offset);
                points.push(TrendPoint {
                    x,
                    mean_ms: mean(samples[start..end].iter().map(|s| s.1).collect()),
                    count: end - start,
                });
                start = end;
            }
            TrendSeries { database, points }
        })
        .collect()
}

fn distribution(records: &[&BenchmarkRecord]) -> ChartKind {
    let databases = databases(records);
    let mut categories: Vec<f64> = records.iter().map(|r| r.scale()).collect();
    categories.sort_by(f64::total_cmp);
    categories.dedup();

    let mut boxes = Vec::new();
    for &scale in &categories {
        for database in &databases {
            let values_ms: Vec<f32> = records
                .iter()
                .filter(|r| r.scale() == scale && r.database == *database)
                .map(|r| r.elapsed_millis() as f32)
                .collect();
            if !values_ms.is_empty() {
                boxes.push(BoxGroup {
                    scale,
                    database: database.clone(),
                    values_ms,
                });
            }
        }
    }

    ChartKind::Distribution {
        categories,
        databases,
        boxes,
    }
}

/// Label for a scale category: integers without a fractional part.
#[must_use]
pub fn format_category(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Rasterize a chart.
///
/// # Errors
///
/// Returns an error if the chart has no drawable data or the figure is too
/// small for its decorations.
pub fn render_chart(spec: &ChartSpec, style: &Style) -> Result<Framebuffer> {
    let legend = spec
        .databases()
        .into_iter()
        .enumerate()
        .map(|(i, db)| LegendEntry::new(db, style.palette.color(i)))
        .collect();
    let frame = Frame::new(style)
        .title(spec.title.as_str())
        .x_label(spec.x_label.as_str())
        .y_label(spec.y_label.as_str())
        .legend(spec.legend_title.as_str(), legend);

    match &spec.kind {
        ChartKind::Trend { series, .. } => {
            let mut chart = LineChart::new().y_scale(spec.y_scale).markers(true);
            for (i, s) in series.iter().enumerate() {
                let x: Vec<f32> = s.points.iter().map(|p| p.x as f32).collect();
                let y: Vec<f32> = s.points.iter().map(|p| p.mean_ms).collect();
                chart = chart.add_series(LineSeries::new(&s.database).data(&x, &y).color(style.palette.color(i)));
            }
            chart.build()?.to_framebuffer(&frame)
        }
        ChartKind::Distribution {
            categories,
            databases,
            boxes,
        } => {
            let mut plot = BoxPlot::new()
                .categories(categories.iter().copied().map(format_category).collect())
                .y_scale(spec.y_scale);
            for (i, db) in databases.iter().enumerate() {
                plot = plot.add_hue(db, style.palette.color(i));
            }
            for b in boxes {
                let category = categories.iter().position(|c| *c == b.scale);
                let hue = databases.iter().position(|d| *d == b.database);
                if let (Some(category), Some(hue)) = (category, hue) {
                    plot = plot.add_box(category, hue, &b.values_ms);
                }
            }
            plot.build()?.to_framebuffer(&frame)
        }
    }
}
