//! Range rings and angle spokes.

use super::transform::{CoordinateTransformer, Point};

/// One angle graduation: a radial line between the innermost and outermost ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spoke {
    /// Domain angle of the spoke.
    pub angle: f64,
    /// Screen-space unit vector `(cos a, -sin a)`.
    pub direction: (f64, f64),
    pub from: Point,
    pub to: Point,
}

/// Grid geometry for one configuration. Always rebuilt as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridGeometry {
    /// Ring distances in domain units, innermost first.
    pub distances: Vec<f64>,
    /// Ring radii in pixels, parallel to `distances`.
    pub radii: Vec<f64>,
    pub spokes: Vec<Spoke>,
    pub center: Point,
}

impl GridGeometry {
    /// Compute `range_ticks` rings over `(0, max_range]` and `angle_ticks`
    /// spokes over one full turn.
    pub fn generate(
        transformer: &CoordinateTransformer,
        range_ticks: usize,
        angle_ticks: usize,
    ) -> Self {
        let scales = transformer.scales();
        let max_range = scales.range.domain().1;
        let turn = scales.angle.domain().1;

        let step = if range_ticks > 0 {
            max_range / range_ticks as f64
        } else {
            0.0
        };
        let distances: Vec<f64> = (1..=range_ticks).map(|i| i as f64 * step).collect();
        let radii: Vec<f64> = distances.iter().map(|&d| scales.range.map(d)).collect();

        let mut spokes = Vec::with_capacity(angle_ticks);
        if let (Some(&inner), Some(&outer)) = (radii.first(), radii.last()) {
            let dm = turn / angle_ticks.max(1) as f64;
            for j in 0..angle_ticks {
                let angle = j as f64 * dm;
                let a = transformer.screen_angle(angle);
                spokes.push(Spoke {
                    angle,
                    direction: (a.cos(), -a.sin()),
                    from: transformer.offset(a, inner),
                    to: transformer.offset(a, outer),
                });
            }
        }

        Self {
            distances,
            radii,
            spokes,
            center: transformer.center(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty() && self.spokes.is_empty()
    }
}
