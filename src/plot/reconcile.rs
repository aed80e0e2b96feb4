//! Keeping a render target in sync with the plot by identity.
//!
//! Each layer has a [`Reconciler`] that remembers what it handed to the
//! target on the previous pass. A pass diffs that against the current
//! primitives and issues creates, then destroys, then updates.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::AddAssign;

use super::transform::Point;

/// Identity of a primitive within its layer.
pub type PrimitiveKey = u64;

/// The primitive groups a surface has to provide, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    GridRings,
    GridSpokes,
    Blips,
    CrosshairRing,
    CrosshairLine,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::GridRings,
        Layer::GridSpokes,
        Layer::Blips,
        Layer::CrosshairRing,
        Layer::CrosshairLine,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Layer::GridRings => "grid-rings",
            Layer::GridSpokes => "grid-spokes",
            Layer::Blips => "blips",
            Layer::CrosshairRing => "crosshair-ring",
            Layer::CrosshairLine => "crosshair-line",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { center: Point, radius: f64 },
    Line { from: Point, to: Point },
    /// Present on the surface but not drawn.
    Hidden,
}

/// What the core asks a surface to show for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub shape: Shape,
    pub class: String,
}

impl Primitive {
    pub fn circle(center: Point, radius: f64, class: impl Into<String>) -> Self {
        Self {
            shape: Shape::Circle { center, radius },
            class: class.into(),
        }
    }

    pub fn line(from: Point, to: Point, class: impl Into<String>) -> Self {
        Self {
            shape: Shape::Line { from, to },
            class: class.into(),
        }
    }

    pub fn hidden(class: impl Into<String>) -> Self {
        Self {
            shape: Shape::Hidden,
            class: class.into(),
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self.shape, Shape::Hidden)
    }
}

/// A drawing surface addressed by `(layer, key)`.
///
/// Keys are unique within a layer. `update` and `destroy` are only ever
/// called for keys previously passed to `create` and not yet destroyed.
pub trait RenderTarget {
    fn create(&mut self, layer: Layer, key: PrimitiveKey, primitive: &Primitive);
    fn update(&mut self, layer: Layer, key: PrimitiveKey, primitive: &Primitive);
    fn destroy(&mut self, layer: Layer, key: PrimitiveKey);
}

/// Counts of operations issued by one or more reconcile passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub updated: usize,
    pub destroyed: usize,
    /// Keys present on both passes whose primitive did not change.
    pub unchanged: usize,
}

impl ReconcileStats {
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.destroyed == 0
    }
}

impl AddAssign for ReconcileStats {
    fn add_assign(&mut self, rhs: Self) {
        self.created += rhs.created;
        self.updated += rhs.updated;
        self.destroyed += rhs.destroyed;
        self.unchanged += rhs.unchanged;
    }
}

/// Remembers the primitives last sent to one layer of a target.
#[derive(Debug, Clone)]
pub struct Reconciler {
    layer: Layer,
    rendered: HashMap<PrimitiveKey, Primitive>,
}

impl Reconciler {
    pub fn new(layer: Layer) -> Self {
        Self {
            layer,
            rendered: HashMap::new(),
        }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Number of primitives currently alive on the target for this layer.
    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }

    pub fn contains(&self, key: PrimitiveKey) -> bool {
        self.rendered.contains_key(&key)
    }

    /// Bring the target in line with `current`. Creation follows the order
    /// of `current`, which is the draw order a retaining surface should use.
    pub fn reconcile<T, I>(&mut self, target: &mut T, current: I) -> ReconcileStats
    where
        T: RenderTarget + ?Sized,
        I: IntoIterator<Item = (PrimitiveKey, Primitive)>,
    {
        let current: Vec<(PrimitiveKey, Primitive)> = current.into_iter().collect();
        let live: HashSet<PrimitiveKey> = current.iter().map(|(k, _)| *k).collect();
        let mut stats = ReconcileStats::default();

        for (key, primitive) in &current {
            if !self.rendered.contains_key(key) {
                target.create(self.layer, *key, primitive);
                stats.created += 1;
            }
        }

        let gone: Vec<PrimitiveKey> = self
            .rendered
            .keys()
            .filter(|k| !live.contains(*k))
            .copied()
            .collect();
        for key in gone {
            target.destroy(self.layer, key);
            self.rendered.remove(&key);
            stats.destroyed += 1;
        }

        for (key, primitive) in current {
            match self.rendered.get(&key) {
                Some(previous) if *previous == primitive => stats.unchanged += 1,
                Some(_) => {
                    target.update(self.layer, key, &primitive);
                    self.rendered.insert(key, primitive);
                    stats.updated += 1;
                }
                None => {
                    self.rendered.insert(key, primitive);
                }
            }
        }

        stats
    }

    /// Destroy everything this layer put on the target.
    pub fn clear<T: RenderTarget + ?Sized>(&mut self, target: &mut T) -> ReconcileStats {
        self.reconcile(target, std::iter::empty())
    }

    /// Forget the target without issuing any destroys, e.g. after the
    /// surface was replaced.
    pub fn forget(&mut self) {
        self.rendered.clear();
    }
}
