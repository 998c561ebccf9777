//! Shared chart decoration: plot area layout, axes, grid, title and legend.
//!
//! Both chart kinds draw their data into the rectangle returned by
//! [`Frame::layout`] and leave everything around it to the frame.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;
use crate::render::{
    draw_dashed_hline, draw_dashed_vline, draw_rect, draw_rect_outline, draw_text,
    draw_text_vertical, text_height, text_width, Anchor,
};
use crate::scale::{format_tick, AxisMapping};
use crate::theme::Style;
use std::borrow::Cow;

/// The legend never takes more than `1 / LEGEND_WIDTH_DIVISOR` of the figure width.
const LEGEND_WIDTH_DIVISOR: u32 = 4;

/// Marker appended to clipped legend labels.
const ELLIPSIS: &str = "..";

/// One row of the legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    /// Series name.
    pub label: String,
    /// Series color.
    pub color: Rgba,
}

impl LegendEntry {
    /// Create a legend entry.
    #[must_use]
    pub fn new(label: impl Into<String>, color: Rgba) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

/// Decorations around a chart's plot area.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    style: &'a Style,
    title: String,
    x_label: String,
    y_label: String,
    legend_title: String,
    legend: Vec<LegendEntry>,
}

impl<'a> Frame<'a> {
    /// Create an undecorated frame using the given style.
    #[must_use]
    pub fn new(style: &'a Style) -> Self {
        Self {
            style,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            legend_title: String::new(),
            legend: Vec::new(),
        }
    }

    /// Set the chart title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the x-axis label.
    #[must_use]
    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    /// Set the y-axis label.
    #[must_use]
    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    /// Set the legend title and entries.
    #[must_use]
    pub fn legend(mut self, title: impl Into<String>, entries: Vec<LegendEntry>) -> Self {
        self.legend_title = title.into();
        self.legend = entries;
        self
    }

    /// Style the frame draws with.
    #[must_use]
    pub fn style(&self) -> &'a Style {
        self.style
    }

    /// A blank figure of the style's pixel size, filled with the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the figure size is zero.
    pub fn canvas(&self) -> Result<Framebuffer> {
        let (width, height) = self.style.pixel_size();
        let mut fb = Framebuffer::new(width, height)?;
        fb.clear(self.style.theme.background);
        Ok(fb)
    }

    /// Width of data lines in pixels.
    #[must_use]
    pub fn line_width(&self) -> f32 {
        self.style.px(1.5)
    }

    /// Diameter of data point markers in pixels.
    #[must_use]
    pub fn marker_size(&self) -> f32 {
        self.style.px(6.0)
    }

    fn pad(&self) -> i32 {
        self.style.px(8.0).round().max(1.0) as i32
    }

    fn tick_len(&self) -> i32 {
        self.style.px(4.0).round().max(1.0) as i32
    }

    fn text_h(&self) -> i32 {
        text_height(self.style.font_scale()) as i32
    }

    fn row_h(&self) -> i32 {
        self.text_h() + self.pad() / 2 + self.pad() / 4
    }

    fn swatch_w(&self) -> i32 {
        self.text_h() * 2
    }

    /// Widest a legend label may be before it is clipped. The whole legend
    /// stays within a quarter of the figure width.
    fn legend_label_limit(&self) -> u32 {
        let (width, _) = self.style.pixel_size();
        let chrome = 2 * self.pad() + self.swatch_w() + self.pad() / 2;
        (width / LEGEND_WIDTH_DIVISOR).saturating_sub(chrome.max(0) as u32)
    }

    fn legend_size(&self) -> (i32, i32) {
        if self.legend.is_empty() {
            return (0, 0);
        }
        let fs = self.style.font_scale();
        let pad = self.pad();
        let limit = self.legend_label_limit();
        let entries = self
            .legend
            .iter()
            .map(|e| {
                let label = clip_text(&e.label, fs, limit);
                self.swatch_w() + pad / 2 + text_width(&label, fs) as i32
            })
            .max()
            .unwrap_or(0);
        let title_w = text_width(&clip_text(&self.legend_title, fs, limit), fs) as i32;
        let width = entries.max(title_w) + 2 * pad;
        let rows = self.legend.len() as i32 + i32::from(!self.legend_title.is_empty());
        (width, rows * self.row_h() + pad * 2)
    }

    /// Compute the plot area for a `width` x `height` figure whose y axis
    /// carries `y_tick_labels`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rendering`] if the decorations leave no room for data.
    pub fn layout(&self, width: u32, height: u32, y_tick_labels: &[String]) -> Result<Rect> {
        let fs = self.style.font_scale();
        let pad = self.pad();
        let text_h = self.text_h();
        let label_w = y_tick_labels
            .iter()
            .map(|l| text_width(l, fs) as i32)
            .max()
            .unwrap_or(0);

        let left = pad + text_h + pad + label_w + pad / 2 + self.tick_len();
        let top = pad * 2 + text_height(self.style.title_font_scale()) as i32 + pad;
        let bottom = self.tick_len() + pad / 2 + text_h + pad + text_h + pad * 2;
        let (legend_w, _) = self.legend_size();
        let right = if legend_w > 0 { legend_w + pad * 3 } else { pad * 2 };

        let plot_w = width as i32 - left - right;
        let plot_h = height as i32 - top - bottom;
        if plot_w <= 0 || plot_h <= 0 {
            return Err(Error::Rendering(format!(
                "plot area too small for a {width}x{height} figure"
            )));
        }
        Ok(Rect::new(left as f32, top as f32, plot_w as f32, plot_h as f32))
    }

    /// Fill the plot area with the panel color.
    pub fn draw_panel(&self, fb: &mut Framebuffer, area: Rect) {
        let theme = &self.style.theme;
        if theme.panel_background != theme.background {
            draw_rect(
                fb,
                area.x as i32,
                area.y as i32,
                area.width as u32,
                area.height as u32,
                theme.panel_background,
            );
        }
    }

    /// Draw horizontal grid lines and tick labels for the value axis.
    pub fn draw_y_axis(&self, fb: &mut Framebuffer, area: Rect, mapping: &AxisMapping) {
        let theme = &self.style.theme;
        let fs = self.style.font_scale();
        let grid_w = self.style.px(0.8).round().max(1.0) as u32;
        let dash = self.style.px(4.0).round().max(1.0) as u32;
        let label_x = area.x as i32 - self.tick_len() - self.pad() / 2;

        for tick in mapping.ticks() {
            let y = mapping.map(tick);
            if y < area.y - 0.5 || y > area.bottom() + 0.5 {
                continue;
            }
            let yi = y.round() as i32;
            if theme.show_grid {
                draw_dashed_hline(fb, area.x as i32, area.right() as i32, yi, grid_w, dash, theme.grid_color);
            }
            if theme.show_ticks {
                draw_rect(fb, area.x as i32 - self.tick_len(), yi, self.tick_len() as u32, grid_w, theme.axis_color);
            }
            draw_text(fb, &format_tick(tick), label_x, yi - self.text_h() / 2, fs, Anchor::End, theme.text_color);
        }
    }

    /// Draw vertical grid lines and labels at the given pixel positions.
    /// Labels that would overlap are thinned out.
    pub fn draw_x_ticks(&self, fb: &mut Framebuffer, area: Rect, ticks: &[(f32, String)]) {
        let theme = &self.style.theme;
        let fs = self.style.font_scale();
        let grid_w = self.style.px(0.8).round().max(1.0) as u32;
        let dash = self.style.px(4.0).round().max(1.0) as u32;
        let label_y = area.bottom() as i32 + self.tick_len() + self.pad() / 2;

        let max_w = ticks.iter().map(|(_, l)| text_width(l, fs)).max().unwrap_or(0) as f32;
        let spacing = ticks
            .windows(2)
            .map(|w| (w[1].0 - w[0].0).abs())
            .fold(f32::INFINITY, f32::min);
        let stride = if spacing.is_finite() && spacing > 0.0 {
            ((max_w + self.pad() as f32) / spacing).ceil().max(1.0) as usize
        } else {
            1
        };

        for (i, (x, label)) in ticks.iter().enumerate() {
            if *x < area.x - 0.5 || *x > area.right() + 0.5 {
                continue;
            }
            let xi = x.round() as i32;
            if theme.show_grid {
                draw_dashed_vline(fb, xi, area.y as i32, area.bottom() as i32, grid_w, dash, theme.grid_color);
            }
            if theme.show_ticks {
                draw_rect(fb, xi, area.bottom() as i32, grid_w, self.tick_len() as u32, theme.axis_color);
            }
            if i % stride == 0 {
                draw_text(fb, label, xi, label_y, fs, Anchor::Middle, theme.text_color);
            }
        }
    }

    /// Draw the panel border, title, axis labels and legend.
    pub fn draw_decorations(&self, fb: &mut Framebuffer, area: Rect) {
        let theme = &self.style.theme;
        let fs = self.style.font_scale();
        let pad = self.pad();
        let border = self.style.px(1.0).round().max(1.0) as u32;

        if theme.show_panel_border {
            draw_rect_outline(
                fb,
                area.x as i32,
                area.y as i32,
                area.width as u32,
                area.height as u32,
                border,
                theme.axis_color,
            );
        }

        if !self.title.is_empty() {
            let available = fb.width().saturating_sub(2 * pad as u32);
            let mut scale = self.style.title_font_scale();
            while scale > 1 && text_width(&self.title, scale) > available {
                scale -= 1;
            }
            let center = (area.x + area.width / 2.0) as i32;
            let x = if text_width(&self.title, scale) > available {
                (fb.width() / 2) as i32
            } else {
                center
                    .max(pad + text_width(&self.title, scale) as i32 / 2)
                    .min(fb.width() as i32 - pad - text_width(&self.title, scale) as i32 / 2)
            };
            draw_text(fb, &self.title, x, pad * 2, scale, Anchor::Middle, theme.text_color);
        }

        if !self.x_label.is_empty() {
            let y = area.bottom() as i32 + self.tick_len() + pad / 2 + self.text_h() + pad;
            let x = (area.x + area.width / 2.0) as i32;
            draw_text(fb, &self.x_label, x, y, fs, Anchor::Middle, theme.text_color);
        }

        if !self.y_label.is_empty() {
            let y = (area.y + area.height / 2.0) as i32;
            draw_text_vertical(fb, &self.y_label, pad, y, fs, Anchor::Middle, theme.text_color);
        }

        self.draw_legend(fb, area);
    }

    fn draw_legend(&self, fb: &mut Framebuffer, area: Rect) {
        let (width, height) = self.legend_size();
        if width == 0 {
            return;
        }
        let theme = &self.style.theme;
        let fs = self.style.font_scale();
        let pad = self.pad();
        let border = self.style.px(0.8).round().max(1.0) as u32;
        let x = area.right() as i32 + pad * 2;
        let y = area.y as i32;

        draw_rect(fb, x, y, width as u32, height as u32, theme.background);
        draw_rect_outline(fb, x, y, width as u32, height as u32, border, theme.grid_color.darken(0.1));

        let limit = self.legend_label_limit();
        let mut row_y = y + pad;
        if !self.legend_title.is_empty() {
            let title = clip_text(&self.legend_title, fs, limit);
            draw_text(fb, &title, x + pad, row_y, fs, Anchor::Start, theme.text_color);
            row_y += self.row_h();
        }
        let swatch_w = self.swatch_w();
        for entry in &self.legend {
            let swatch_h = (self.text_h() / 2).max(1);
            draw_rect(
                fb,
                x + pad,
                row_y + (self.text_h() - swatch_h) / 2,
                swatch_w as u32,
                swatch_h as u32,
                entry.color,
            );
            draw_text(
                fb,
                &clip_text(&entry.label, fs, limit),
                x + pad + swatch_w + pad / 2,
                row_y,
                fs,
                Anchor::Start,
                theme.text_color,
            );
            row_y += self.row_h();
        }
    }
}

/// Shorten `text` with a trailing `..` so it renders within `limit` pixels.
fn clip_text(text: &str, scale: u32, limit: u32) -> Cow<'_, str> {
    if text_width(text, scale) <= limit {
        return Cow::Borrowed(text);
    }
    let mut clipped = String::new();
    for ch in text.chars() {
        clipped.push(ch);
        if text_width(&format!("{clipped}{ELLIPSIS}"), scale) > limit {
            clipped.pop();
            break;
        }
    }
    clipped.push_str(ELLIPSIS);
    Cow::Owned(clipped)
}

/// Tick labels for a value axis, in tick order.
#[must_use]
pub fn y_tick_labels(mapping: &AxisMapping) -> Vec<String> {
    mapping.ticks().into_iter().map(format_tick).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::AxisScale;

    fn small_style() -> Style {
        Style {
            dpi: 100,
            ..Style::default()
        }
    }

    #[test]
    fn test_layout_leaves_room_for_legend() {
        let style = small_style();
        let plain = Frame::new(&style).layout(1000, 600, &["100".into()]).unwrap();
        let with_legend = Frame::new(&style)
            .legend("Database", vec![LegendEntry::new("PostgreSQL", Rgba::BLUE)])
            .layout(1000, 600, &["100".into()])
            .unwrap();
        assert!(with_legend.width < plain.width);
        assert!(plain.right() <= 1000.0);
        assert!(plain.bottom() <= 600.0);
    }

    #[test]
    fn test_long_legend_label_is_clipped_to_quarter_width() {
        let style = small_style();
        let name = "VeryLongDatabaseName".repeat(8);
        let frame = Frame::new(&style).legend("Database", vec![LegendEntry::new(name.clone(), Rgba::RED)]);

        let (legend_w, _) = frame.legend_size();
        assert!(legend_w <= 250, "legend is {legend_w}px wide");
        let area = frame.layout(1000, 600, &["1000".into()]).unwrap();
        assert!(area.width > 500.0);

        let mut fb = frame.canvas().unwrap();
        frame.draw_decorations(&mut fb, area);
        assert!(fb.count_color(Rgba::RED) > 0);
    }

    #[test]
    fn test_clip_text_keeps_short_and_marks_long() {
        assert_eq!(clip_text("MongoDB", 1, 1000), "MongoDB");
        let clipped = clip_text("PostgreSQL-16-with-extensions", 1, text_width("Postgre..", 1));
        assert_eq!(clipped, "Postgre..");
    }

    #[test]
    fn test_layout_too_small_fails() {
        let style = small_style();
        let result = Frame::new(&style).layout(20, 20, &[]);
        assert!(matches!(result, Err(Error::Rendering(_))));
    }

    #[test]
    fn test_canvas_matches_style_size() {
        let style = small_style();
        let fb = Frame::new(&style).canvas().unwrap();
        assert_eq!((fb.width(), fb.height()), (1000, 600));
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_decorations_draw_text_and_grid() {
        let style = small_style();
        let frame = Frame::new(&style)
            .title("Operation: GetAllAsync")
            .x_label("Scale")
            .y_label("Mean time (ms)")
            .legend("Database", vec![LegendEntry::new("A", Rgba::RED)]);
        let mut fb = frame.canvas().unwrap();
        let mapping = AxisMapping::for_values(AxisScale::Linear, &[10.0], (1.0, 0.0)).unwrap();
        let labels = y_tick_labels(&mapping);
        let area = frame.layout(fb.width(), fb.height(), &labels).unwrap();
        let mapping =
            AxisMapping::for_values(AxisScale::Linear, &[10.0], (area.bottom(), area.y)).unwrap();

        frame.draw_panel(&mut fb, area);
        frame.draw_y_axis(&mut fb, area, &mapping);
        frame.draw_decorations(&mut fb, area);

        assert!(fb.count_color(style.theme.text_color) > 0);
        assert!(fb.count_color(Rgba::RED) > 0);
        assert!(fb.count_color(style.theme.grid_color) > 0);
    }
}
