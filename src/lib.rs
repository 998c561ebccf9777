//! # dbbench-viz
//!
//! Comparative chart generation for database benchmark measurements.
//!
//! Reads timing records (operation, database, entity type, scale, entity
//! count, elapsed microseconds) and writes one PNG chart per group of
//! records: a trend line per database for collection-wide operations, a box
//! plot per scale and database for single-item operations.
//!
//! Rendering is pure Rust with no system font or graphics library: charts
//! are rasterized into a [`framebuffer::Framebuffer`] with an embedded
//! bitmap font and encoded with the `png` crate.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dbbench_viz::prelude::*;
//!
//! let config = Config {
//!     input_path: "metrics.csv".into(),
//!     output_dir: "charts".into(),
//!     grouping_mode: GroupingMode::PerEntity,
//!     ..Config::default()
//! };
//! let report = Pipeline::new(config)?.run()?;
//! println!("{} charts written", report.written.len());
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Render independent groups with rayon
//!
//! ## Academic References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Tukey, J. W. (1977). *Exploratory Data Analysis*. Addison-Wesley.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and color space conversions.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Geometric primitives (points, rectangles).
pub mod geometry;

/// Scale functions for data-to-visual mappings.
pub mod scale;

/// Themes, palettes and figure style.
pub mod theme;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rasterization of lines, shapes and text.
pub mod render;

/// Line charts, box plots and their shared frame.
pub mod plots;

/// Output encoders (PNG).
pub mod output;

// ============================================================================
// Benchmark Pipeline
// ============================================================================

/// Benchmark records and the CSV loader.
pub mod record;

/// Operation taxonomy.
pub mod classify;

/// Grouping of records into charts.
pub mod group;

/// Chart selection and rendering.
pub mod chart;

/// Writing chart images.
pub mod artifact;

/// Run configuration.
pub mod config;

/// End-to-end run.
pub mod pipeline;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for dbbench-viz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use dbbench_viz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::artifact::ArtifactWriter;
    pub use crate::chart::{render_chart, select_chart, ChartKind, ChartSpec, XDimension};
    pub use crate::classify::{classify, ChartFamily, Classification, Operation};
    pub use crate::color::{Hsla, Rgba};
    pub use crate::config::{Config, FailurePolicy};
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::group::{enumerate, plan, Group, GroupKey, GroupingMode};
    pub use crate::pipeline::{GroupFailure, Pipeline, RunReport};
    pub use crate::record::{load_records, load_records_from_reader, BenchmarkRecord};
    pub use crate::scale::{AxisScale, LinearScale, LogScale, Scale};
    pub use crate::theme::{Palette, Style, Theme};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
