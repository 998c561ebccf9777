//! Rasterization of geometric primitives and text.
//!
//! # Algorithms
//!
//! - **Wu's Anti-aliased Line**: Smooth line rendering with sub-pixel accuracy
//! - **Bresenham's Line**: Path along which thick lines are stamped
//! - **Midpoint Circle**: Filled circles for data point markers
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."

mod primitives;
mod text;

pub use primitives::{
    draw_circle, draw_dashed_hline, draw_dashed_vline, draw_line_aa, draw_rect,
    draw_rect_outline, draw_thick_line,
};
pub use text::{
    draw_text, draw_text_vertical, glyph, text_height, text_width, Anchor, GLYPH_ADVANCE,
    GLYPH_HEIGHT, GLYPH_WIDTH,
};
