//! Primitive rendering functions.
//!
//! Rasterization for the shapes a chart needs: lines (plain, anti-aliased,
//! thick, dashed), rectangles and filled circles for markers.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

// ============================================================================
// Line Drawing
// ============================================================================

/// Walk the pixels of a Bresenham line, calling `plot` for each.
fn bresenham(x0: i32, y0: i32, x1: i32, y1: i32, mut plot: impl FnMut(i32, i32)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let (mut x, mut y) = (x0, y0);

    loop {
        plot(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Draw an anti-aliased line using Wu's algorithm.
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();

    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { dy / dx };

    let mut put = |a: i32, b: i32, intensity: f32| {
        if steep {
            plot(fb, b, a, color, intensity);
        } else {
            plot(fb, a, b, color, intensity);
        }
    };

    // First endpoint
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpxl1 = xend as i32;
    let ypxl1 = yend.floor() as i32;
    put(xpxl1, ypxl1, rfpart(yend) * xgap);
    put(xpxl1, ypxl1 + 1, fpart(yend) * xgap);

    let mut intery = yend + gradient;

    // Second endpoint
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend as i32;
    let ypxl2 = yend.floor() as i32;
    put(xpxl2, ypxl2, rfpart(yend) * xgap);
    put(xpxl2, ypxl2 + 1, fpart(yend) * xgap);

    for x in (xpxl1 + 1)..xpxl2 {
        let ipart = intery.floor() as i32;
        put(x, ipart, rfpart(intery));
        put(x, ipart + 1, fpart(intery));
        intery += gradient;
    }
}

/// Draw a line of the given pixel width. Widths up to 1.5 fall back to Wu's
/// algorithm; wider lines stamp filled discs along a Bresenham path.
pub fn draw_thick_line(
    fb: &mut Framebuffer,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    width: f32,
    color: Rgba,
) {
    if width <= 1.5 {
        draw_line_aa(fb, x0, y0, x1, y1, color);
        return;
    }

    let radius = (width / 2.0).round() as i32;
    bresenham(
        x0.round() as i32,
        y0.round() as i32,
        x1.round() as i32,
        y1.round() as i32,
        |x, y| draw_circle(fb, x, y, radius, color),
    );
}

/// Draw a dashed horizontal line from `x0` to `x1` at row `y`.
pub fn draw_dashed_hline(
    fb: &mut Framebuffer,
    x0: i32,
    x1: i32,
    y: i32,
    thickness: u32,
    dash: u32,
    color: Rgba,
) {
    if y < 0 {
        return;
    }
    let period = (dash.max(1) * 2) as i32;
    let mut x = x0.max(0);
    while x < x1 {
        let len = (dash as i32).min(x1 - x).max(0) as u32;
        fill_blend(fb, x as u32, y as u32, len, thickness.max(1), color);
        x += period;
    }
}

/// Draw a dashed vertical line from `y0` to `y1` at column `x`.
pub fn draw_dashed_vline(
    fb: &mut Framebuffer,
    x: i32,
    y0: i32,
    y1: i32,
    thickness: u32,
    dash: u32,
    color: Rgba,
) {
    if x < 0 {
        return;
    }
    let period = (dash.max(1) * 2) as i32;
    let mut y = y0.max(0);
    while y < y1 {
        let len = (dash as i32).min(y1 - y).max(0) as u32;
        fill_blend(fb, x as u32, y as u32, thickness.max(1), len, color);
        y += period;
    }
}

/// Plot a pixel with intensity (for anti-aliased drawing).
#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f32) {
    if x >= 0 && y >= 0 {
        let alpha = (f32::from(color.a) * intensity.clamp(0.0, 1.0)) as u8;
        fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
    }
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

// ============================================================================
// Rectangle Drawing
// ============================================================================

/// Draw a filled rectangle, blending when the color is translucent.
pub fn draw_rect(fb: &mut Framebuffer, x: i32, y: i32, width: u32, height: u32, color: Rgba) {
    let (x, width) = clip_span(x, width);
    let (y, height) = clip_span(y, height);
    fill_blend(fb, x, y, width, height, color);
}

/// Draw a rectangle outline with the given border thickness.
pub fn draw_rect_outline(
    fb: &mut Framebuffer,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    thickness: u32,
    color: Rgba,
) {
    let t = thickness.max(1).min(width).min(height);
    draw_rect(fb, x, y, width, t, color);
    draw_rect(fb, x, y + height as i32 - t as i32, width, t, color);
    draw_rect(fb, x, y + t as i32, t, height.saturating_sub(2 * t), color);
    draw_rect(fb, x + width as i32 - t as i32, y + t as i32, t, height.saturating_sub(2 * t), color);
}

/// Clip a (start, length) span to non-negative coordinates.
fn clip_span(start: i32, len: u32) -> (u32, u32) {
    if start >= 0 {
        (start as u32, len)
    } else {
        (0, len.saturating_sub(start.unsigned_abs()))
    }
}

fn fill_blend(fb: &mut Framebuffer, x: u32, y: u32, width: u32, height: u32, color: Rgba) {
    if color.a == 255 {
        fb.fill_rect(x, y, width, height, color);
        return;
    }
    let x_end = x.saturating_add(width).min(fb.width());
    let y_end = y.saturating_add(height).min(fb.height());
    for py in y..y_end {
        for px in x..x_end {
            fb.blend_pixel(px, py, color);
        }
    }
}

// ============================================================================
// Circle Drawing
// ============================================================================

/// Draw a filled circle using the midpoint algorithm.
pub fn draw_circle(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 && cx >= 0 && cy >= 0 {
            fb.set_pixel(cx as u32, cy as u32, color);
        }
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        draw_span(fb, cx - x, cx + x, cy + y, color);
        draw_span(fb, cx - x, cx + x, cy - y, color);
        draw_span(fb, cx - y, cx + y, cy + x, color);
        draw_span(fb, cx - y, cx + y, cy - x, color);

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

#[inline]
fn draw_span(fb: &mut Framebuffer, x1: i32, x2: i32, y: i32, color: Rgba) {
    if y < 0 || y >= fb.height() as i32 {
        return;
    }

    let x_start = x1.max(0) as u32;
    let x_end = (x2 + 1).clamp(0, fb.width() as i32) as u32;

    if x_start < x_end {
        fb.fill_rect(x_start, y as u32, x_end - x_start, 1, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(w: u32, h: u32) -> Framebuffer {
        let mut fb = Framebuffer::new(w, h).unwrap();
        fb.clear(Rgba::WHITE);
        fb
    }

    #[test]
    fn test_bresenham_visits_every_column() {
        let mut visited = Vec::new();
        bresenham(2, 2, 12, 2, |x, y| visited.push((x, y)));
        assert_eq!(visited.len(), 11);
        assert!(visited.iter().all(|&(_, y)| y == 2));
    }

    #[test]
    fn test_thick_line_out_of_bounds_is_clipped() {
        let mut fb = white(10, 10);
        draw_thick_line(&mut fb, -5.0, -5.0, 20.0, 20.0, 3.0, Rgba::BLACK);
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::BLACK));
    }

    #[test]
    fn test_draw_line_aa_touches_endpoints() {
        let mut fb = white(50, 50);
        draw_line_aa(&mut fb, 5.0, 5.0, 40.0, 30.0, Rgba::BLACK);
        assert_ne!(fb.get_pixel(20, 15), None);
        assert!(fb.count_color(Rgba::WHITE) < 50 * 50);
    }

    #[test]
    fn test_thick_line_is_wider_than_thin() {
        let mut thin = white(60, 60);
        let mut thick = white(60, 60);
        draw_thick_line(&mut thin, 5.0, 30.0, 55.0, 30.0, 1.0, Rgba::BLUE);
        draw_thick_line(&mut thick, 5.0, 30.0, 55.0, 30.0, 6.0, Rgba::BLUE);
        assert!(thick.count_color(Rgba::BLUE) > 3 * thin.count_color(Rgba::BLUE).max(1));
    }

    #[test]
    fn test_dashed_hline_leaves_gaps() {
        let mut fb = white(40, 3);
        draw_dashed_hline(&mut fb, 0, 40, 1, 1, 4, Rgba::BLACK);
        assert_eq!(fb.count_color(Rgba::BLACK), 20);
        assert_eq!(fb.get_pixel(5, 1), Some(Rgba::WHITE));
    }

    #[test]
    fn test_rect_outline_hollow() {
        let mut fb = white(20, 20);
        draw_rect_outline(&mut fb, 2, 2, 10, 10, 1, Rgba::BLACK);
        assert_eq!(fb.get_pixel(2, 2), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(6, 6), Some(Rgba::WHITE));
        assert_eq!(fb.count_color(Rgba::BLACK), 36);
    }

    #[test]
    fn test_rect_negative_origin_is_clipped() {
        let mut fb = white(10, 10);
        draw_rect(&mut fb, -3, -3, 5, 5, Rgba::RED);
        assert_eq!(fb.count_color(Rgba::RED), 4);
    }

    #[test]
    fn test_draw_circle() {
        let mut fb = white(30, 30);
        draw_circle(&mut fb, 15, 15, 5, Rgba::RED);
        assert_eq!(fb.get_pixel(15, 15), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_circle_zero_radius() {
        let mut fb = white(5, 5);
        draw_circle(&mut fb, 2, 2, 0, Rgba::RED);
        assert_eq!(fb.count_color(Rgba::RED), 1);
    }
}
