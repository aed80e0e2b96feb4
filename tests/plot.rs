//! End-to-end checks of the plot core against a recording surface.

use polarscope::plot::{
    Blip, Layer, PlotConfig, Point, PolarPlot, Primitive, PrimitiveKey, RenderTarget, Shape,
};
use std::collections::HashMap;

const EPS: f64 = 1e-9;

/// Surface that keeps live primitives and counts every call.
#[derive(Default)]
struct Recorder {
    live: HashMap<(Layer, PrimitiveKey), Primitive>,
    creates: usize,
    updates: usize,
    destroys: usize,
}

impl Recorder {
    fn count(&self, layer: Layer) -> usize {
        self.live.keys().filter(|(l, _)| *l == layer).count()
    }

    fn reset_counts(&mut self) {
        self.creates = 0;
        self.updates = 0;
        self.destroys = 0;
    }

    fn blip_center(&self, key: PrimitiveKey) -> Point {
        match self.live[&(Layer::Blips, key)].shape {
            Shape::Circle { center, .. } => center,
            ref other => panic!("blip is not a circle: {:?}", other),
        }
    }
}

impl RenderTarget for Recorder {
    fn create(&mut self, layer: Layer, key: PrimitiveKey, primitive: &Primitive) {
        let previous = self.live.insert((layer, key), primitive.clone());
        assert!(previous.is_none(), "duplicate create for {} {}", layer, key);
        self.creates += 1;
    }

    fn update(&mut self, layer: Layer, key: PrimitiveKey, primitive: &Primitive) {
        let slot = self.live.get_mut(&(layer, key)).expect("update of unknown primitive");
        *slot = primitive.clone();
        self.updates += 1;
    }

    fn destroy(&mut self, layer: Layer, key: PrimitiveKey) {
        assert!(self.live.remove(&(layer, key)).is_some(), "destroy of unknown primitive");
        self.destroys += 1;
    }
}

fn unrotated() -> PlotConfig {
    PlotConfig {
        rotation_offset: 0.0,
        ..PlotConfig::default()
    }
}

fn angle_diff(a: f64, b: f64, turn: f64) -> f64 {
    let d = (a - b).rem_euclid(turn);
    d.min(turn - d)
}

mod reconciliation {
    use super::*;

    #[test]
    fn second_render_of_unchanged_store_is_noop() {
        let mut plot = PolarPlot::new(PlotConfig::default()).unwrap();
        plot.add_blip("a", 10.0, 10.0, 0.0);
        plot.add_blip("b", 20.0, 200.0, 50.0);
        let mut surface = Recorder::default();

        let first = plot.render(&mut surface);
        assert_eq!(first.blips.created, 2);
        surface.reset_counts();

        let second = plot.render(&mut surface);
        assert_eq!(surface.creates, 0);
        assert_eq!(surface.destroys, 0);
        assert_eq!(surface.updates, 0);
        assert!(second.total().is_noop());
        assert_eq!(second.blips.unchanged, 2);
    }

    #[test]
    fn add_blip_adds_exactly_one_primitive() {
        let mut plot = PolarPlot::new(PlotConfig::default()).unwrap();
        let mut surface = Recorder::default();
        plot.add_blip("a", 10.0, 10.0, 0.0);
        plot.render(&mut surface);
        let before = surface.count(Layer::Blips);

        plot.add_blip("b", 30.0, 40.0, 0.0);
        plot.render(&mut surface);
        assert_eq!(surface.count(Layer::Blips), before + 1);
        assert_eq!(plot.rendered_blip_count(), before + 1);
    }

    #[test]
    fn clear_then_render_removes_all_blips() {
        let mut plot = PolarPlot::new(PlotConfig::default()).unwrap();
        let mut surface = Recorder::default();
        for i in 0..10 {
            plot.add_blip("x", i as f64 * 20.0, i as f64 * 36.0, 0.0);
        }
        plot.render(&mut surface);
        assert_eq!(surface.count(Layer::Blips), 10);

        plot.clear_blips();
        plot.render(&mut surface);
        assert_eq!(surface.count(Layer::Blips), 0);
        // Grid is untouched by blip operations.
        assert_eq!(surface.count(Layer::GridRings), 4);
    }

    #[test]
    fn replacement_updates_in_place() {
        let mut plot = PolarPlot::new(PlotConfig::default()).unwrap();
        let mut surface = Recorder::default();
        let keep = plot.add_blip("a", 10.0, 10.0, 0.0);
        let gone = plot.add_blip("b", 20.0, 20.0, 0.0);
        plot.render(&mut surface);
        surface.reset_counts();

        plot.replace_blip(keep, Blip::new("hostile", 50.0, 10.0, 0.0));
        plot.remove_blip(gone);
        plot.add_blip("c", 30.0, 30.0, 0.0);
        let stats = plot.render(&mut surface);

        assert_eq!((stats.blips.created, stats.blips.updated, stats.blips.destroyed), (1, 1, 1));
        assert_eq!(surface.live[&(Layer::Blips, keep.key())].class, "hostile");
    }

    #[test]
    fn removing_unknown_handle_is_noop() {
        let mut plot = PolarPlot::new(PlotConfig::default()).unwrap();
        let h = plot.add_blip("a", 10.0, 10.0, 0.0);
        assert!(plot.remove_blip(h).is_some());
        assert!(plot.remove_blip(h).is_none());
        assert_eq!(plot.blip_count(), 0);
    }

    #[test]
    fn non_finite_blip_stays_idempotent() {
        let mut plot = PolarPlot::new(PlotConfig::default()).unwrap();
        let mut surface = Recorder::default();
        let bad = plot.add_blip("ghost", f64::NAN, 0.0, 0.0);
        plot.add_blip("a", 10.0, 10.0, 0.0);
        plot.render(&mut surface);
        assert!(surface.live[&(Layer::Blips, bad.key())].is_hidden());
        surface.reset_counts();

        let stats = plot.render(&mut surface);
        assert!(stats.total().is_noop());
        assert_eq!(surface.updates, 0);
        assert_eq!(plot.blip_at(Point::new(250.0, 250.0)), None);
    }

    #[test]
    fn set_blips_replaces_identities() {
        let mut plot = PolarPlot::new(PlotConfig::default()).unwrap();
        let mut surface = Recorder::default();
        let old = plot.add_blip("a", 10.0, 10.0, 0.0);
        plot.render(&mut surface);

        let handles = plot.set_blips(vec![
            Blip::new("x", 1.0, 2.0, 3.0),
            Blip::new("y", 4.0, 5.0, 6.0),
        ]);
        plot.render(&mut surface);
        assert!(!surface.live.contains_key(&(Layer::Blips, old.key())));
        for h in handles {
            assert!(surface.live.contains_key(&(Layer::Blips, h.key())));
        }
    }
}

mod geometry {
    use super::*;

    #[test]
    fn ring_distances_for_four_ticks() {
        let plot = PolarPlot::new(PlotConfig {
            range_ticks: 4,
            max_range: 256.0,
            ..PlotConfig::default()
        })
        .unwrap();
        assert_eq!(plot.grid().distances, vec![64.0, 128.0, 192.0, 256.0]);
    }

    #[test]
    fn round_trip_across_rotations() {
        for rotation in [0.0, 0.3, std::f64::consts::FRAC_PI_2, -2.0, 10.0] {
            let plot = PolarPlot::new(PlotConfig {
                rotation_offset: rotation,
                ..PlotConfig::default()
            })
            .unwrap();
            for step in 0..=32 {
                let range = step as f64 * 8.0;
                let scale = &plot.scales().range;
                assert!((scale.map(scale.invert(range)) - range).abs() < EPS);
                if range == 0.0 {
                    continue;
                }
                let angle = step as f64 * 11.0;
                let (a, r) = plot.screen_to_polar(plot.polar_to_screen(angle, range));
                assert!((r - range).abs() < EPS);
                assert!(angle_diff(a, angle, 360.0) < EPS);
            }
        }
    }

    #[test]
    fn center_change_translates_every_blip() {
        let mut plot = PolarPlot::new(unrotated()).unwrap();
        let mut surface = Recorder::default();
        let handles = [
            plot.add_blip("a", 10.0, 0.0, 0.0),
            plot.add_blip("b", 100.0, 77.0, 0.0),
            plot.add_blip("c", 200.0, 300.0, 0.0),
        ];
        plot.render(&mut surface);
        let before: Vec<Point> = handles.iter().map(|h| surface.blip_center(h.key())).collect();

        let old = plot.config().center;
        surface.reset_counts();
        plot.set_center(Point::new(400.0, 400.0)).unwrap();
        plot.render(&mut surface);
        assert_eq!((surface.creates, surface.destroys), (0, 0));
        assert_eq!(plot.blip_count(), 3);

        for (h, b) in handles.iter().zip(before) {
            let after = surface.blip_center(h.key());
            assert!((after.x - b.x - (400.0 - old.x)).abs() < EPS);
            assert!((after.y - b.y - (400.0 - old.y)).abs() < EPS);
        }
    }

    #[test]
    fn rotation_change_updates_blips_and_spokes_only() {
        let mut plot = PolarPlot::new(unrotated()).unwrap();
        let mut surface = Recorder::default();
        let east = plot.add_blip("a", 128.0, 0.0, 0.0);
        let north = plot.add_blip("b", 64.0, 90.0, 0.0);
        plot.render(&mut surface);
        assert!((surface.blip_center(east.key()).x - 375.0).abs() < EPS);
        surface.reset_counts();

        plot.set_rotation(std::f64::consts::FRAC_PI_2).unwrap();
        let stats = plot.render(&mut surface);

        assert_eq!((surface.creates, surface.destroys), (0, 0));
        assert_eq!(stats.blips.updated, 2);
        assert_eq!(stats.spokes.updated, 8);
        assert_eq!(stats.rings.unchanged, 4);
        assert_eq!(stats.rings.updated, 0);

        // A quarter turn counter-clockwise about (250, 250).
        let e = surface.blip_center(east.key());
        assert!((e.x - 250.0).abs() < EPS && (e.y - 125.0).abs() < EPS);
        let n = surface.blip_center(north.key());
        assert!((n.x - 187.5).abs() < EPS && (n.y - 250.0).abs() < EPS);
    }

    #[test]
    fn tick_change_regenerates_grid() {
        let mut plot = PolarPlot::new(PlotConfig::default()).unwrap();
        let mut surface = Recorder::default();
        plot.add_blip("a", 10.0, 10.0, 0.0);
        plot.render(&mut surface);
        assert_eq!(surface.count(Layer::GridRings), 4);
        assert_eq!(surface.count(Layer::GridSpokes), 8);
        surface.reset_counts();

        plot.set_ticks(2, 3).unwrap();
        let stats = plot.render(&mut surface);

        assert_eq!((stats.rings.updated, stats.rings.destroyed), (2, 2));
        assert_eq!((stats.spokes.updated, stats.spokes.destroyed), (3, 5));
        assert_eq!(stats.rings.created + stats.spokes.created, 0);
        assert_eq!(stats.blips.unchanged, 1);
        assert_eq!(surface.count(Layer::GridRings), 2);
        assert_eq!(surface.count(Layer::GridSpokes), 3);
        assert_eq!(plot.grid().distances, vec![128.0, 256.0]);

        plot.set_ticks(4, 8).unwrap();
        let stats = plot.render(&mut surface);
        assert_eq!((stats.rings.created, stats.spokes.created), (2, 5));
        assert_eq!(surface.count(Layer::GridSpokes), 8);
    }

    #[test]
    fn radius_change_rescales_in_place() {
        let mut plot = PolarPlot::new(unrotated()).unwrap();
        let mut surface = Recorder::default();
        let h = plot.add_blip("a", 256.0, 0.0, 0.0);
        plot.render(&mut surface);
        surface.reset_counts();

        plot.set_radius(100.0).unwrap();
        plot.render(&mut surface);
        assert_eq!((surface.creates, surface.destroys), (0, 0));
        assert!((surface.blip_center(h.key()).x - 350.0).abs() < EPS);
        assert!(plot.set_radius(-1.0).is_err());
        assert_eq!(plot.config().radius, 100.0);
    }

    #[test]
    fn out_of_domain_values_are_clamped() {
        let plot = PolarPlot::new(unrotated()).unwrap();
        let far = plot.project(&Blip::new("x", 1e6, 0.0, 1e6));
        match far.shape {
            Shape::Circle { center, radius } => {
                assert!((center.x - 500.0).abs() < EPS);
                assert!((radius - 10.0).abs() < EPS);
            }
            other => panic!("unexpected {:?}", other),
        }
        let near = plot.project(&Blip::new("x", -5.0, 0.0, -1e6));
        match near.shape {
            Shape::Circle { center, radius } => {
                assert_eq!(center, Point::new(250.0, 250.0));
                assert_eq!(radius, 0.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}

mod crosshair {
    use super::*;

    #[test]
    fn shown_inside_and_hidden_at_max_range() {
        let mut plot = PolarPlot::new(PlotConfig {
            max_range: 256.0,
            ..unrotated()
        })
        .unwrap();
        let mut surface = Recorder::default();

        assert!(plot.draw_crosshair(&mut surface, (0.0, 100.0)));
        match surface.live[&(Layer::CrosshairRing, 0)].shape {
            Shape::Circle { radius, .. } => {
                assert!((radius - plot.scales().range.map(100.0)).abs() < EPS)
            }
            ref other => panic!("unexpected {:?}", other),
        }

        assert!(!plot.draw_crosshair(&mut surface, (0.0, 256.0)));
        assert!(surface.live[&(Layer::CrosshairRing, 0)].is_hidden());
        assert!(surface.live[&(Layer::CrosshairLine, 0)].is_hidden());
        assert!(!plot.draw_crosshair(&mut surface, (0.0, 1000.0)));
        assert_eq!(surface.destroys, 0);
    }

    #[test]
    fn pointer_to_crosshair() {
        let mut plot = PolarPlot::new(unrotated()).unwrap();
        let mut surface = Recorder::default();
        let polar = plot.pointer_moved(Point::new(250.0, 150.0));
        assert!((polar.0 - 90.0).abs() < EPS);
        assert!((polar.1 - 102.4).abs() < EPS);
        assert!(plot.draw_crosshair(&mut surface, polar));
        match surface.live[&(Layer::CrosshairLine, 0)].shape {
            Shape::Line { from, to } => {
                assert_eq!(from, Point::new(250.0, 250.0));
                assert!((to.x - 250.0).abs() < EPS && to.y.abs() < EPS);
            }
            ref other => panic!("unexpected {:?}", other),
        }
    }
}

#[test]
fn invalid_configs_fail_fast() {
    let configs = [
        PlotConfig {
            radius: -1.0,
            ..PlotConfig::default()
        },
        PlotConfig {
            max_range: 0.0,
            ..PlotConfig::default()
        },
        PlotConfig {
            min_power: 10.0,
            max_power: -10.0,
            ..PlotConfig::default()
        },
    ];
    for config in configs {
        assert!(PolarPlot::new(config).is_err());
    }
}
