use super::reconcile::{Layer, Primitive, RenderTarget};
use super::transform::CoordinateTransformer;

pub const CROSSHAIR_CLASS: &str = "crosshair";

/// Ring plus radial line marking one polar coordinate.
///
/// Both primitives are created on first use and afterwards only updated;
/// going out of range hides them instead of destroying them so a surface
/// can keep animating them.
#[derive(Debug, Clone, Default)]
pub struct Crosshair {
    created: bool,
    visible: bool,
}

impl Crosshair {
    const KEY: u64 = 0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Primitives for `(angle, range)`: ring first, then line.
    pub fn primitives(
        transformer: &CoordinateTransformer,
        angle: f64,
        range: f64,
    ) -> (Primitive, Primitive) {
        let scales = transformer.scales();
        let max_range = scales.range.domain().1;
        if range < max_range {
            let center = transformer.center();
            let ring = Primitive::circle(center, scales.range.map(range), CROSSHAIR_CLASS);
            let edge = transformer.polar_to_screen(angle, max_range);
            let line = Primitive::line(center, edge, CROSSHAIR_CLASS);
            (ring, line)
        } else {
            (Primitive::hidden(CROSSHAIR_CLASS), Primitive::hidden(CROSSHAIR_CLASS))
        }
    }

    /// Show the crosshair at `(angle, range)`, or hide it when the range is
    /// at or beyond the plot edge. Returns whether it is visible.
    pub fn draw<T: RenderTarget + ?Sized>(
        &mut self,
        target: &mut T,
        transformer: &CoordinateTransformer,
        (angle, range): (f64, f64),
    ) -> bool {
        let (ring, line) = Self::primitives(transformer, angle, range);
        self.visible = !ring.is_hidden();
        self.apply(target, &ring, &line);
        self.visible
    }

    /// Hide without destroying. A no-op before the first draw.
    pub fn hide<T: RenderTarget + ?Sized>(&mut self, target: &mut T) {
        if self.created && self.visible {
            let hidden = Primitive::hidden(CROSSHAIR_CLASS);
            self.apply(target, &hidden, &hidden);
        }
        self.visible = false;
    }

    /// Drop the primitives from the target entirely.
    pub fn remove<T: RenderTarget + ?Sized>(&mut self, target: &mut T) {
        if self.created {
            target.destroy(Layer::CrosshairRing, Self::KEY);
            target.destroy(Layer::CrosshairLine, Self::KEY);
        }
        self.created = false;
        self.visible = false;
    }

    fn apply<T: RenderTarget + ?Sized>(
        &mut self,
        target: &mut T,
        ring: &Primitive,
        line: &Primitive,
    ) {
        if self.created {
            target.update(Layer::CrosshairRing, Self::KEY, ring);
            target.update(Layer::CrosshairLine, Self::KEY, line);
        } else {
            target.create(Layer::CrosshairRing, Self::KEY, ring);
            target.create(Layer::CrosshairLine, Self::KEY, line);
            self.created = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::reconcile::{PrimitiveKey, Shape};
    use crate::plot::{PlotConfig, ScaleSet};

    #[derive(Default)]
    struct Ops {
        created: usize,
        updated: usize,
        destroyed: usize,
        last: Vec<(Layer, Primitive)>,
    }

    impl RenderTarget for Ops {
        fn create(&mut self, layer: Layer, _: PrimitiveKey, p: &Primitive) {
            self.created += 1;
            self.last.push((layer, p.clone()));
        }
        fn update(&mut self, layer: Layer, _: PrimitiveKey, p: &Primitive) {
            self.updated += 1;
            self.last.push((layer, p.clone()));
        }
        fn destroy(&mut self, _: Layer, _: PrimitiveKey) {
            self.destroyed += 1;
        }
    }

    fn transformer() -> CoordinateTransformer {
        let config = PlotConfig {
            rotation_offset: 0.0,
            ..PlotConfig::default()
        };
        CoordinateTransformer::new(ScaleSet::from_config(&config).unwrap(), config.center, 0.0)
    }

    #[test]
    fn test_visible_inside_range() {
        let t = transformer();
        let mut ops = Ops::default();
        let mut c = Crosshair::new();
        assert!(c.draw(&mut ops, &t, (0.0, 100.0)));
        assert_eq!(ops.created, 2);
        match ops.last[0].1.shape {
            Shape::Circle { radius, .. } => {
                assert!((radius - t.scales().range.map(100.0)).abs() < 1e-9)
            }
            ref other => panic!("expected ring, got {:?}", other),
        }
        match ops.last[1].1.shape {
            Shape::Line { from, to } => {
                assert_eq!(from, t.center());
                assert!((to.x - 500.0).abs() < 1e-9);
            }
            ref other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_hidden_at_and_beyond_max_range() {
        let t = transformer();
        let mut ops = Ops::default();
        let mut c = Crosshair::new();
        c.draw(&mut ops, &t, (0.0, 100.0));
        assert!(!c.draw(&mut ops, &t, (0.0, 256.0)));
        assert!(!c.draw(&mut ops, &t, (0.0, 300.0)));
        assert_eq!(ops.created, 2);
        assert_eq!(ops.updated, 4);
        assert_eq!(ops.destroyed, 0);
        assert!(ops.last.iter().rev().take(2).all(|(_, p)| p.is_hidden()));
    }

    #[test]
    fn test_remove_destroys_both() {
        let t = transformer();
        let mut ops = Ops::default();
        let mut c = Crosshair::new();
        c.remove(&mut ops);
        assert_eq!(ops.destroyed, 0);
        c.draw(&mut ops, &t, (10.0, 10.0));
        c.remove(&mut ops);
        assert_eq!(ops.destroyed, 2);
    }
}
