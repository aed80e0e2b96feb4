use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::scale::ScaleSet;

/// A position in screen pixels. `y` grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Angles this close below a full turn snap back to zero after wrapping.
const WRAP_EPSILON: f64 = 1e-12;

/// Converts between polar domain coordinates and screen pixels.
///
/// Angles run counter-clockwise from the screen +x axis after the rotation
/// offset is added; the y axis is flipped because screen y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransformer {
    scales: ScaleSet,
    center: Point,
    rotation_offset: f64,
}

impl CoordinateTransformer {
    pub fn new(scales: ScaleSet, center: Point, rotation_offset: f64) -> Self {
        Self {
            scales,
            center,
            rotation_offset,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn rotation_offset(&self) -> f64 {
        self.rotation_offset
    }

    pub fn scales(&self) -> &ScaleSet {
        &self.scales
    }

    /// Screen angle in radians for a domain angle, rotation included.
    #[inline]
    pub fn screen_angle(&self, angle: f64) -> f64 {
        self.scales.angle.map(angle) + self.rotation_offset
    }

    /// Project `(angle, range)` onto the screen. Range is clamped by the
    /// range scale; angle extrapolates.
    pub fn polar_to_screen(&self, angle: f64, range: f64) -> Point {
        let a = self.screen_angle(angle);
        let r = self.scales.range.map(range);
        self.offset(a, r)
    }

    /// Point at pixel distance `radius` from the center along screen angle `a`.
    #[inline]
    pub fn offset(&self, a: f64, radius: f64) -> Point {
        Point::new(
            self.center.x + radius * a.cos(),
            self.center.y - radius * a.sin(),
        )
    }

    /// Inverse of [`polar_to_screen`](Self::polar_to_screen). Returns
    /// `(angle, range)` with the angle in `[0, turn)`; the center itself
    /// reports angle 0.
    pub fn screen_to_polar(&self, point: Point) -> (f64, f64) {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        let r = dx.hypot(dy);
        let range = self.scales.range.invert(r);
        if r == 0.0 {
            return (0.0, range);
        }

        let mut a = ((-dy).atan2(dx) - self.rotation_offset).rem_euclid(TAU);
        if TAU - a < WRAP_EPSILON {
            a = 0.0;
        }
        (self.scales.angle.invert(a), range)
    }
}

/// Fit a circle inside a `width` x `height` pixel area.
/// Returns the center and a radius leaving a small margin at the edges.
pub fn fit_circle(width: usize, height: usize) -> (Point, f64) {
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let radius = (width.min(height) as f64 / 2.0) * 0.95;
    (Point::new(cx, cy), radius)
}
