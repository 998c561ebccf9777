//! Run configuration.
//!
//! Supports YAML configuration with precedence: CLI > file > defaults.

use crate::error::{Error, Result};
use crate::group::GroupingMode;
use crate::theme::{Palette, Style, Theme};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Highest accepted output resolution.
pub const MAX_DPI: u32 = 1200;

/// What to do when one chart cannot be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Record the failure and keep going with the remaining groups.
    #[default]
    Continue,
    /// Stop the run at the first failure.
    Abort,
}

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Benchmark CSV to read.
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// Directory charts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// How records are grouped into charts.
    #[serde(default)]
    pub grouping_mode: GroupingMode,

    /// Output resolution in dots per inch.
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Figure width in inches.
    #[serde(default = "default_figure_width")]
    pub figure_width: f32,

    /// Figure height in inches.
    #[serde(default = "default_figure_height")]
    pub figure_height: f32,

    /// Theme name (whitegrid, darkgrid, white, ticks).
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Palette name (deep, muted, colorblind).
    #[serde(default = "default_palette")]
    pub palette: String,

    /// Behavior when a chart fails.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("metrics.csv")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_dpi() -> u32 {
    300
}
fn default_figure_width() -> f32 {
    10.0
}
fn default_figure_height() -> f32 {
    6.0
}
fn default_theme() -> String {
    "whitegrid".to_string()
}
fn default_palette() -> String {
    "deep".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_dir: default_output_dir(),
            grouping_mode: GroupingMode::default(),
            dpi: default_dpi(),
            figure_width: default_figure_width(),
            figure_height: default_figure_height(),
            theme: default_theme(),
            palette: default_palette(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            key: path.display().to_string(),
            message: format!("cannot read configuration file: {e}"),
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })
    }

    /// Check every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DPI).contains(&self.dpi) {
            return Err(invalid("dpi", format!("{} is outside 1..={MAX_DPI}", self.dpi)));
        }
        for (key, value) in [("figure_width", self.figure_width), ("figure_height", self.figure_height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(key, format!("{value} must be a positive number of inches")));
            }
        }
        if self.input_path.as_os_str().is_empty() {
            return Err(invalid("input_path", "must not be empty".into()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(invalid("output_dir", "must not be empty".into()));
        }
        self.style().map(|_| ())
    }

    /// Build the immutable rendering style.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unknown theme or palette name.
    pub fn style(&self) -> Result<Style> {
        Ok(Style {
            theme: self.theme.parse::<Theme>()?,
            palette: self.palette.parse::<Palette>()?,
            figure_width: self.figure_width,
            figure_height: self.figure_height,
            dpi: self.dpi,
        })
    }
}

fn invalid(key: &str, message: String) -> Error {
    Error::Config {
        key: key.to_string(),
        message,
    }
}
