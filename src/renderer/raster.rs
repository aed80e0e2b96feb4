//! Pixel-level drawing primitives on a [`Canvas`].

use super::Canvas;

/// Plot a pixel given signed coordinates, dropping anything off-canvas.
#[inline]
fn plot(canvas: &mut Canvas, x: isize, y: isize, rgb: (u8, u8, u8), opacity: f32) {
    if x >= 0 && y >= 0 && (x as usize) < canvas.width && (y as usize) < canvas.height {
        canvas.put_pixel(x as usize, y as usize, rgb.0, rgb.1, rgb.2, opacity);
    }
}

/// Circle outline, stepped along the circumference.
pub fn stroke_circle(
    canvas: &mut Canvas,
    cx: f64,
    cy: f64,
    radius: f64,
    rgb: (u8, u8, u8),
    opacity: f32,
) {
    if radius <= 0.0 {
        plot(canvas, cx.round() as isize, cy.round() as isize, rgb, opacity);
        return;
    }
    let steps = ((radius * std::f64::consts::TAU).ceil() as usize).max(8);
    for step in 0..steps {
        let angle = (step as f64 / steps as f64) * std::f64::consts::TAU;
        let px = (cx + angle.cos() * radius).round() as isize;
        let py = (cy + angle.sin() * radius).round() as isize;
        plot(canvas, px, py, rgb, opacity);
    }
}

/// Filled disc. Sub-pixel radii still light the center pixel.
pub fn fill_circle(
    canvas: &mut Canvas,
    cx: f64,
    cy: f64,
    radius: f64,
    rgb: (u8, u8, u8),
    opacity: f32,
) {
    let x0 = cx.round() as isize;
    let y0 = cy.round() as isize;
    let r = radius.max(0.5);
    let reach = r.ceil() as isize;
    let r2 = r * r;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let fx = (x0 + dx) as f64 - cx;
            let fy = (y0 + dy) as f64 - cy;
            if fx * fx + fy * fy <= r2 || (dx == 0 && dy == 0) {
                plot(canvas, x0 + dx, y0 + dy, rgb, opacity);
            }
        }
    }
}

/// Clip a segment to the pixel rectangle `[-0.5, w - 0.5] x [-0.5, h - 0.5]`
/// (Liang-Barsky). Returns `None` when nothing of it is on the canvas.
fn clip_segment(
    width: usize,
    height: usize,
    from: (f64, f64),
    to: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    if width == 0 || height == 0 {
        return None;
    }
    let (min_x, max_x) = (-0.5, width as f64 - 0.5);
    let (min_y, max_y) = (-0.5, height as f64 - 0.5);
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, from.0 - min_x),
        (dx, max_x - from.0),
        (-dy, from.1 - min_y),
        (dy, max_y - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}

/// Draw a line using Bresenham's algorithm, clipped to the canvas first.
pub fn line(
    canvas: &mut Canvas,
    from: (f64, f64),
    to: (f64, f64),
    rgb: (u8, u8, u8),
    opacity: f32,
) {
    if !(from.0.is_finite() && from.1.is_finite() && to.0.is_finite() && to.1.is_finite()) {
        return;
    }
    let Some((from, to)) = clip_segment(canvas.width, canvas.height, from, to) else {
        return;
    };
    let mut x0 = from.0.round() as isize;
    let mut y0 = from.1.round() as isize;
    let x1 = to.0.round() as isize;
    let y1 = to.1.round() as isize;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx: isize = if x0 < x1 { 1 } else { -1 };
    let sy: isize = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(canvas, x0, y0, rgb, opacity);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
