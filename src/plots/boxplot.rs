//! Grouped box plots.
//!
//! Box plots display the distribution of data through quartiles. Boxes are
//! laid out in categories along the x axis, with one box per hue (series)
//! inside each category, side by side.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;
use crate::plots::frame::{y_tick_labels, Frame};
use crate::render::{draw_rect, draw_rect_outline, draw_thick_line};
use crate::scale::{AxisMapping, AxisScale};

/// Statistics computed for a box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    /// Lowest value within the lower fence (whisker end)
    pub min: f32,
    /// First quartile (25th percentile)
    pub q1: f32,
    /// Median (50th percentile)
    pub median: f32,
    /// Third quartile (75th percentile)
    pub q3: f32,
    /// Highest value within the upper fence (whisker end)
    pub max: f32,
    /// Interquartile range (Q3 - Q1)
    pub iqr: f32,
    /// Values beyond 1.5 IQR from the box
    pub outliers: Vec<f32>,
}

impl BoxStats {
    /// Compute box plot statistics from data.
    ///
    /// Uses the 1.5 * IQR rule for whisker length. Non-finite values are
    /// ignored; returns `None` when nothing finite remains.
    #[must_use]
    pub fn from_data(data: &[f32]) -> Option<Self> {
        let mut sorted: Vec<f32> = data.iter().copied().filter(|x| x.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f32::total_cmp);

        let n = sorted.len();
        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;

        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;

        let min = sorted
            .iter()
            .copied()
            .find(|&x| x >= lower_fence)
            .unwrap_or(sorted[0]);
        let max = sorted
            .iter()
            .rev()
            .copied()
            .find(|&x| x <= upper_fence)
            .unwrap_or(sorted[n - 1]);

        let outliers: Vec<f32> = sorted
            .iter()
            .copied()
            .filter(|&x| x < lower_fence || x > upper_fence)
            .collect();

        Some(Self {
            min,
            q1,
            median,
            q3,
            max,
            iqr,
            outliers,
        })
    }

    /// Smallest and largest value drawn for this box, outliers included.
    #[must_use]
    pub fn extent(&self) -> (f32, f32) {
        let lo = self.outliers.iter().copied().fold(self.min, f32::min);
        let hi = self.outliers.iter().copied().fold(self.max, f32::max);
        (lo, hi)
    }
}

/// Calculate percentile using linear interpolation.
fn percentile(sorted: &[f32], p: f32) -> f32 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let k = (p / 100.0) * (sorted.len() - 1) as f32;
    let f = k.floor() as usize;
    let c = k.ceil() as usize;

    if f == c || c >= sorted.len() {
        sorted[f.min(sorted.len() - 1)]
    } else {
        let d = k - f as f32;
        sorted[f] * (1.0 - d) + sorted[c] * d
    }
}

#[derive(Debug, Clone)]
struct BoxEntry {
    category: usize,
    hue: usize,
    values: Vec<f32>,
}

/// Box width as a fraction of the space given to one hue.
const BOX_WIDTH: f32 = 0.8;

/// Grouped box plot builder.
#[derive(Debug, Clone)]
pub struct BoxPlot {
    categories: Vec<String>,
    hues: Vec<(String, Rgba)>,
    boxes: Vec<BoxEntry>,
    y_scale: AxisScale,
}

impl Default for BoxPlot {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxPlot {
    /// Create a new box plot builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            hues: Vec::new(),
            boxes: Vec::new(),
            y_scale: AxisScale::Linear,
        }
    }

    /// Set the x-axis categories, in display order.
    #[must_use]
    pub fn categories(mut self, labels: Vec<String>) -> Self {
        self.categories = labels;
        self
    }

    /// Add a hue (series) with its color.
    #[must_use]
    pub fn add_hue(mut self, name: impl Into<String>, color: Rgba) -> Self {
        self.hues.push((name.into(), color));
        self
    }

    /// Add the values for one box, addressed by category and hue index.
    #[must_use]
    pub fn add_box(mut self, category: usize, hue: usize, values: &[f32]) -> Self {
        self.boxes.push(BoxEntry {
            category,
            hue,
            values: values.to_vec(),
        });
        self
    }

    /// Set the y-axis transform.
    #[must_use]
    pub fn y_scale(mut self, scale: AxisScale) -> Self {
        self.y_scale = scale;
        self
    }

    /// Build the box plot.
    ///
    /// # Errors
    ///
    /// Returns an error if no box has finite data, or a box refers to a
    /// category or hue that was not declared.
    pub fn build(self) -> Result<BuiltBoxPlot> {
        let mut boxes = Vec::with_capacity(self.boxes.len());
        for entry in &self.boxes {
            if entry.category >= self.categories.len() || entry.hue >= self.hues.len() {
                return Err(Error::Rendering(format!(
                    "box refers to category {} / hue {} but only {} / {} are declared",
                    entry.category,
                    entry.hue,
                    self.categories.len(),
                    self.hues.len()
                )));
            }
            if let Some(stats) = BoxStats::from_data(&entry.values) {
                boxes.push((entry.category, entry.hue, stats));
            }
        }

        if boxes.is_empty() {
            return Err(Error::EmptyData);
        }

        Ok(BuiltBoxPlot {
            categories: self.categories,
            hues: self.hues,
            boxes,
            y_scale: self.y_scale,
        })
    }
}

/// A built box plot ready for rendering.
#[derive(Debug)]
pub struct BuiltBoxPlot {
    categories: Vec<String>,
    hues: Vec<(String, Rgba)>,
    boxes: Vec<(usize, usize, BoxStats)>,
    y_scale: AxisScale,
}

impl BuiltBoxPlot {
    fn y_values(&self) -> Vec<f32> {
        self.boxes
            .iter()
            .flat_map(|(_, _, s)| {
                let (lo, hi) = s.extent();
                [lo, s.q1, s.q3, hi]
            })
            .collect()
    }

    /// Render to a fresh canvas sized by the frame's style.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn to_framebuffer(&self, frame: &Frame<'_>) -> Result<Framebuffer> {
        let mut fb = frame.canvas()?;
        self.render(&mut fb, frame)?;
        Ok(fb)
    }

    /// Render onto an existing framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the plot area or the value axis cannot be built.
    pub fn render(&self, fb: &mut Framebuffer, frame: &Frame<'_>) -> Result<()> {
        let values = self.y_values();
        let probe = AxisMapping::for_values(self.y_scale, &values, (1.0, 0.0))?;
        let area = frame.layout(fb.width(), fb.height(), &y_tick_labels(&probe))?;
        let y_axis = AxisMapping::for_values(self.y_scale, &values, (area.bottom(), area.y))?;

        frame.draw_panel(fb, area);
        frame.draw_y_axis(fb, area, &y_axis);

        let n_categories = self.categories.len().max(1) as f32;
        let slot = area.width / n_categories;
        let x_ticks: Vec<(f32, String)> = self
            .categories
            .iter()
            .enumerate()
            .map(|(i, label)| (area.x + slot * (i as f32 + 0.5), label.clone()))
            .collect();
        frame.draw_x_ticks(fb, area, &x_ticks);

        let group_width = slot * 0.8;
        let hue_width = group_width / self.hues.len().max(1) as f32;
        for (category, hue, stats) in &self.boxes {
            let center = area.x + slot * (*category as f32 + 0.5) - group_width / 2.0
                + hue_width * (*hue as f32 + 0.5);
            let color = self.hues[*hue].1;
            self.draw_box(fb, frame, area, &y_axis, stats, center, hue_width * BOX_WIDTH, color);
        }

        frame.draw_decorations(fb, area);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_box(
        &self,
        fb: &mut Framebuffer,
        frame: &Frame<'_>,
        area: Rect,
        y_axis: &AxisMapping,
        stats: &BoxStats,
        center: f32,
        width: f32,
        fill: Rgba,
    ) {
        let edge = fill.darken(0.55);
        let line = frame.line_width().round().max(1.0) as u32;
        let map_y = |v: f32| y_axis.map(v).clamp(area.y, area.bottom()).round() as i32;

        let cx = center.round() as i32;
        let half = (width / 2.0).round() as i32;
        let cap_half = (half / 2).max(1);
        let y_min = map_y(stats.min);
        let y_q1 = map_y(stats.q1);
        let y_median = map_y(stats.median);
        let y_q3 = map_y(stats.q3);
        let y_max = map_y(stats.max);
        let lw = line as i32;

        // Whiskers and caps
        draw_rect(fb, cx - lw / 2, y_q1, line, (y_min - y_q1).max(0) as u32, edge);
        draw_rect(fb, cx - lw / 2, y_max, line, (y_q3 - y_max).max(0) as u32, edge);
        draw_rect(fb, cx - cap_half, y_min - lw / 2, (2 * cap_half) as u32, line, edge);
        draw_rect(fb, cx - cap_half, y_max - lw / 2, (2 * cap_half) as u32, line, edge);

        // Box (Q1 to Q3), at least one line tall
        let top = y_q3.min(y_q1);
        let height = ((y_q1 - y_q3).abs() as u32).max(line);
        draw_rect(fb, cx - half, top, (2 * half) as u32, height, fill);
        draw_rect_outline(fb, cx - half, top, (2 * half) as u32, height, line, edge);

        // Median
        draw_rect(fb, cx - half, y_median - lw / 2, (2 * half) as u32, line, edge);

        let arm = (frame.marker_size() / 2.0).max(1.0);
        let thickness = frame.line_width() * 0.75;
        for &outlier in &stats.outliers {
            let y = map_y(outlier) as f32;
            draw_thick_line(fb, center - arm, y - arm, center + arm, y + arm, thickness, edge);
            draw_thick_line(fb, center - arm, y + arm, center + arm, y - arm, thickness, edge);
        }
    }
}
