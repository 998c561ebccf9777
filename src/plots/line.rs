//! Multi-series line charts for trends across a numeric x dimension.
//!
//! # Algorithms
//!
//! - **Wu's Line Algorithm**: anti-aliased segments at base resolution
//! - **Disc stamping**: thick segments at print resolution
//!
//! Each series is drawn as connected segments in x order with a filled
//! circular marker on every data point.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::plots::frame::{y_tick_labels, Frame};
use crate::render::{draw_circle, draw_thick_line};
use crate::scale::{format_tick, AxisMapping, AxisScale, LinearScale, Scale};

// ============================================================================
// Line Series
// ============================================================================

/// A data series for line charts.
#[derive(Debug, Clone)]
pub struct LineSeries {
    /// Series name/label.
    pub name: String,
    /// X-axis data.
    pub x_data: Vec<f32>,
    /// Y-axis data.
    pub y_data: Vec<f32>,
    /// Line color.
    pub color: Rgba,
}

impl LineSeries {
    /// Create a new line series.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x_data: Vec::new(),
            y_data: Vec::new(),
            color: Rgba::BLUE,
        }
    }

    /// Set the x and y data.
    #[must_use]
    pub fn data(mut self, x: &[f32], y: &[f32]) -> Self {
        self.x_data = x.to_vec();
        self.y_data = y.to_vec();
        self
    }

    /// Set the line color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Get the number of points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.x_data.len().min(self.y_data.len())
    }
}

// ============================================================================
// Line Chart
// ============================================================================

/// Builder for creating line charts.
#[derive(Debug, Clone)]
pub struct LineChart {
    series: Vec<LineSeries>,
    y_scale: AxisScale,
    show_markers: bool,
}

impl Default for LineChart {
    fn default() -> Self {
        Self::new()
    }
}

impl LineChart {
    /// Create a new line chart builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            series: Vec::new(),
            y_scale: AxisScale::Linear,
            show_markers: true,
        }
    }

    /// Add a data series.
    #[must_use]
    pub fn add_series(mut self, series: LineSeries) -> Self {
        self.series.push(series);
        self
    }

    /// Set the y-axis transform.
    #[must_use]
    pub fn y_scale(mut self, scale: AxisScale) -> Self {
        self.y_scale = scale;
        self
    }

    /// Enable or disable data point markers.
    #[must_use]
    pub fn markers(mut self, show: bool) -> Self {
        self.show_markers = show;
        self
    }

    /// Build and validate the line chart.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no series, a series is empty, or a
    /// series has different x and y lengths.
    pub fn build(self) -> Result<Self> {
        if self.series.is_empty() {
            return Err(Error::EmptyData);
        }

        for series in &self.series {
            if series.x_data.is_empty() || series.y_data.is_empty() {
                return Err(Error::EmptyData);
            }

            if series.x_data.len() != series.y_data.len() {
                return Err(Error::DataLengthMismatch {
                    x_len: series.x_data.len(),
                    y_len: series.y_data.len(),
                });
            }
        }

        Ok(self)
    }

    /// X extent across all series, widened when every point shares one x.
    fn x_domain(&self) -> (f32, f32) {
        let (lo, hi) = self
            .series
            .iter()
            .flat_map(|s| s.x_data.iter().copied())
            .filter(|x| x.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });
        if !lo.is_finite() {
            return (0.0, 1.0);
        }
        if hi - lo <= f32::EPSILON * lo.abs().max(hi.abs()) {
            let widen = (lo.abs() * 1e-3).max(1.0);
            return (lo - widen, hi + widen);
        }
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }

    fn y_values(&self) -> Vec<f32> {
        self.series.iter().flat_map(|s| s.y_data.iter().copied()).collect()
    }

    /// Render the chart, with decorations from `frame`, onto `fb`.
    ///
    /// # Errors
    ///
    /// Returns an error if the plot area or the scales cannot be built.
    pub fn render(&self, fb: &mut Framebuffer, frame: &Frame<'_>) -> Result<()> {
        let values = self.y_values();
        let probe = AxisMapping::for_values(self.y_scale, &values, (1.0, 0.0))?;
        let area = frame.layout(fb.width(), fb.height(), &y_tick_labels(&probe))?;
        let y_axis = AxisMapping::for_values(self.y_scale, &values, (area.bottom(), area.y))?;
        let x_axis = LinearScale::new(self.x_domain(), (area.x, area.right()))?;

        frame.draw_panel(fb, area);
        frame.draw_y_axis(fb, area, &y_axis);
        let x_ticks: Vec<(f32, String)> = x_axis
            .ticks(8)
            .into_iter()
            .map(|t| (x_axis.scale(t), format_tick(t)))
            .collect();
        frame.draw_x_ticks(fb, area, &x_ticks);

        for series in &self.series {
            self.render_series(fb, frame, series, area, &x_axis, &y_axis);
        }

        frame.draw_decorations(fb, area);
        Ok(())
    }

    fn render_series(
        &self,
        fb: &mut Framebuffer,
        frame: &Frame<'_>,
        series: &LineSeries,
        area: Rect,
        x_axis: &LinearScale,
        y_axis: &AxisMapping,
    ) {
        let mut points: Vec<Point> = (0..series.point_count())
            .filter(|&i| series.x_data[i].is_finite() && series.y_data[i].is_finite())
            .map(|i| {
                Point::new(
                    x_axis.scale(series.x_data[i]),
                    y_axis.map(series.y_data[i]).clamp(area.y, area.bottom()),
                )
            })
            .collect();
        points.sort_by(|a, b| a.x.total_cmp(&b.x));

        let width = frame.line_width();
        for pair in points.windows(2) {
            draw_thick_line(fb, pair[0].x, pair[0].y, pair[1].x, pair[1].y, width, series.color);
        }

        if self.show_markers {
            let radius = (frame.marker_size() / 2.0).round() as i32;
            let edge = frame.style().theme.background;
            for p in &points {
                draw_circle(fb, p.x.round() as i32, p.y.round() as i32, radius + 1, edge);
                draw_circle(fb, p.x.round() as i32, p.y.round() as i32, radius, series.color);
            }
        }
    }

    /// Render onto a fresh canvas sized by the frame's style.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn to_framebuffer(&self, frame: &Frame<'_>) -> Result<Framebuffer> {
        let mut fb = frame.canvas()?;
        self.render(&mut fb, frame)?;
        Ok(fb)
    }
}

// ============================================================================
// Tests
// ============================================================================
