//! Themes, palettes and the immutable style every chart is rendered with.
//!
//! A [`Style`] is built once per run and shared by reference with the
//! renderer, so groups can be rendered in any order or in parallel.

use crate::color::{Hsla, Rgba};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Non-data appearance of a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Name the theme was selected by.
    pub name: &'static str,
    /// Figure background color.
    pub background: Rgba,
    /// Plot panel background color.
    pub panel_background: Rgba,
    /// Grid line color.
    pub grid_color: Rgba,
    /// Axis line and tick color.
    pub axis_color: Rgba,
    /// Text color.
    pub text_color: Rgba,
    /// Draw grid lines.
    pub show_grid: bool,
    /// Draw a frame around the panel.
    pub show_panel_border: bool,
    /// Draw tick marks outside the panel.
    pub show_ticks: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::whitegrid()
    }
}

impl Theme {
    /// White panel with light grey grid.
    #[must_use]
    pub fn whitegrid() -> Self {
        Self {
            name: "whitegrid",
            background: Rgba::WHITE,
            panel_background: Rgba::WHITE,
            grid_color: Rgba::rgb(204, 204, 204),
            axis_color: Rgba::rgb(204, 204, 204),
            text_color: Rgba::rgb(38, 38, 38),
            show_grid: true,
            show_panel_border: true,
            show_ticks: false,
        }
    }

    /// Grey panel with white grid.
    #[must_use]
    pub fn darkgrid() -> Self {
        Self {
            name: "darkgrid",
            background: Rgba::WHITE,
            panel_background: Rgba::rgb(234, 234, 242),
            grid_color: Rgba::WHITE,
            axis_color: Rgba::rgb(234, 234, 242),
            text_color: Rgba::rgb(38, 38, 38),
            show_grid: true,
            show_panel_border: false,
            show_ticks: false,
        }
    }

    /// White panel, no grid.
    #[must_use]
    pub fn white() -> Self {
        Self {
            name: "white",
            background: Rgba::WHITE,
            panel_background: Rgba::WHITE,
            grid_color: Rgba::WHITE,
            axis_color: Rgba::rgb(38, 38, 38),
            text_color: Rgba::rgb(38, 38, 38),
            show_grid: false,
            show_panel_border: true,
            show_ticks: false,
        }
    }

    /// White panel, no grid, outward tick marks.
    #[must_use]
    pub fn ticks() -> Self {
        Self {
            name: "ticks",
            show_ticks: true,
            ..Self::white()
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whitegrid" => Ok(Self::whitegrid()),
            "darkgrid" => Ok(Self::darkgrid()),
            "white" => Ok(Self::white()),
            "ticks" => Ok(Self::ticks()),
            other => Err(Error::Config {
                key: "theme".into(),
                message: format!("unknown theme '{other}' (expected whitegrid, darkgrid, white or ticks)"),
            }),
        }
    }
}

/// Series colors, one per database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    name: &'static str,
    colors: Vec<Rgba>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::deep()
    }
}

impl Palette {
    /// Saturated, medium-luminance colors.
    #[must_use]
    pub fn deep() -> Self {
        Self {
            name: "deep",
            colors: vec![
                Rgba::rgb(76, 114, 176),
                Rgba::rgb(221, 132, 82),
                Rgba::rgb(85, 168, 104),
                Rgba::rgb(196, 78, 82),
                Rgba::rgb(129, 114, 179),
                Rgba::rgb(147, 120, 96),
                Rgba::rgb(218, 139, 195),
                Rgba::rgb(140, 140, 140),
                Rgba::rgb(204, 185, 116),
                Rgba::rgb(100, 181, 205),
            ],
        }
    }

    /// Lower-saturation variant of `deep`.
    #[must_use]
    pub fn muted() -> Self {
        Self {
            name: "muted",
            colors: vec![
                Rgba::rgb(72, 120, 208),
                Rgba::rgb(238, 133, 74),
                Rgba::rgb(106, 204, 100),
                Rgba::rgb(214, 95, 95),
                Rgba::rgb(149, 108, 180),
                Rgba::rgb(140, 97, 60),
                Rgba::rgb(220, 126, 192),
                Rgba::rgb(121, 121, 121),
                Rgba::rgb(213, 187, 103),
                Rgba::rgb(130, 198, 226),
            ],
        }
    }

    /// Colors distinguishable under common color vision deficiencies.
    #[must_use]
    pub fn colorblind() -> Self {
        Self {
            name: "colorblind",
            colors: vec![
                Rgba::rgb(1, 115, 178),
                Rgba::rgb(222, 143, 5),
                Rgba::rgb(2, 158, 115),
                Rgba::rgb(213, 94, 0),
                Rgba::rgb(204, 120, 188),
                Rgba::rgb(202, 145, 97),
                Rgba::rgb(251, 175, 228),
                Rgba::rgb(148, 148, 148),
                Rgba::rgb(236, 225, 51),
                Rgba::rgb(86, 180, 233),
            ],
        }
    }

    /// Name the palette was selected by.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of distinct base colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for the `index`-th series. Past the end of the palette, colors
    /// repeat with the hue rotated so series stay distinguishable.
    #[must_use]
    pub fn color(&self, index: usize) -> Rgba {
        if self.colors.is_empty() {
            return Rgba::BLACK;
        }
        let base = self.colors[index % self.colors.len()];
        let cycle = index / self.colors.len();
        if cycle == 0 {
            return base;
        }
        let (h, s, l) = rgb_to_hsl(base);
        Hsla::hsl(h + 37.0 * cycle as f32, s, l).to_rgba()
    }
}

impl FromStr for Palette {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deep" => Ok(Self::deep()),
            "muted" => Ok(Self::muted()),
            "colorblind" => Ok(Self::colorblind()),
            other => Err(Error::Config {
                key: "palette".into(),
                message: format!("unknown palette '{other}' (expected deep, muted or colorblind)"),
            }),
        }
    }
}

fn rgb_to_hsl(c: Rgba) -> (f32, f32, f32) {
    let r = f32::from(c.r) / 255.0;
    let g = f32::from(c.g) / 255.0;
    let b = f32::from(c.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    if d == 0.0 {
        return (0.0, 0.0, l);
    }
    let s = d / (1.0 - (2.0 * l - 1.0).abs());
    let h = if max == r {
        60.0 * ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / d + 2.0)
    } else {
        60.0 * ((r - g) / d + 4.0)
    };
    (h, s, l)
}

/// Reference resolution at which base sizes (fonts, line widths) are defined.
const BASE_DPI: f32 = 100.0;

/// Everything about a chart's look that does not depend on the data.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Theme colors and decorations.
    pub theme: Theme,
    /// Series colors.
    pub palette: Palette,
    /// Figure width in inches.
    pub figure_width: f32,
    /// Figure height in inches.
    pub figure_height: f32,
    /// Output resolution in dots per inch.
    pub dpi: u32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            palette: Palette::default(),
            figure_width: 10.0,
            figure_height: 6.0,
            dpi: 300,
        }
    }
}

impl Style {
    /// Pixel dimensions of the figure.
    #[must_use]
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f32;
        (
            (self.figure_width * dpi).round().max(1.0) as u32,
            (self.figure_height * dpi).round().max(1.0) as u32,
        )
    }

    /// Multiplier applied to sizes defined at 100 DPI.
    #[must_use]
    pub fn scale_factor(&self) -> f32 {
        (self.dpi as f32 / BASE_DPI).max(0.25)
    }

    /// Integer font scale for body text (tick labels, legend).
    #[must_use]
    pub fn font_scale(&self) -> u32 {
        (1.5 * self.scale_factor()).round().max(1.0) as u32
    }

    /// Integer font scale for the chart title.
    #[must_use]
    pub fn title_font_scale(&self) -> u32 {
        self.font_scale() + (self.font_scale() / 3).max(1)
    }

    /// A base size in pixels at 100 DPI, converted to this style's resolution.
    #[must_use]
    pub fn px(&self, base: f32) -> f32 {
        base * self.scale_factor()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.pixel_size();
        write!(
            f,
            "{} / {} at {} dpi ({w}x{h} px)",
            self.theme.name,
            self.palette.name(),
            self.dpi
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_str_case_insensitive() {
        assert_eq!("DarkGrid".parse::<Theme>().unwrap(), Theme::darkgrid());
        assert!("neon".parse::<Theme>().is_err());
    }

    #[test]
    fn test_ticks_theme_extends_white() {
        let t = Theme::ticks();
        assert!(t.show_ticks);
        assert!(!t.show_grid);
    }

    #[test]
    fn test_palette_cycles_with_new_hues() {
        let p = Palette::deep();
        assert_eq!(p.color(0), p.color(0));
        assert_ne!(p.color(0), p.color(p.len()));
        assert_ne!(p.color(1), p.color(p.len() + 1));
    }

    #[test]
    fn test_unknown_palette_is_config_error() {
        let err = "rainbow".parse::<Palette>().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_default_style_is_ten_by_six_at_300_dpi() {
        let style = Style::default();
        assert_eq!(style.pixel_size(), (3000, 1800));
        assert!((style.scale_factor() - 3.0).abs() < f32::EPSILON);
        assert_eq!(style.font_scale(), 5);
        assert!(style.title_font_scale() > style.font_scale());
    }

    #[test]
    fn test_rgb_to_hsl_primary() {
        let (h, s, l) = rgb_to_hsl(Rgba::rgb(0, 0, 255));
        assert!((h - 240.0).abs() < 0.5);
        assert!((s - 1.0).abs() < 1e-3);
        assert!((l - 0.5).abs() < 1e-3);
    }
}
