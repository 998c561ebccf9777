//! High-level plot types.
//!
//! Provides ready-to-use visualization types with builder APIs. Each plot
//! draws its data inside the area laid out by a [`Frame`], which owns the
//! axes, grid, title and legend.

mod boxplot;
pub mod frame;
mod line;

pub use boxplot::{BoxPlot, BoxStats, BuiltBoxPlot};
pub use frame::{Frame, LegendEntry};
pub use line::{LineChart, LineSeries};
