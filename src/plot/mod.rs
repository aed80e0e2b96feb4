//! Polar plot core
//!
//! [`PolarPlot`] owns the scales, the coordinate transformer, the grid
//! geometry and the blip store, and pushes primitives to any
//! [`RenderTarget`] through per-layer reconcilers. Nothing here draws
//! pixels; see [`crate::renderer`] for a raster surface.

mod crosshair;
mod error;
mod grid;
mod reconcile;
mod scale;
mod store;
mod transform;

pub use crosshair::{Crosshair, CROSSHAIR_CLASS};
pub use error::PlotError;
pub use grid::{GridGeometry, Spoke};
pub use reconcile::{
    Layer, Primitive, PrimitiveKey, ReconcileStats, Reconciler, RenderTarget, Shape,
};
pub use scale::{Response, Scale, ScaleSet};
pub use store::{Blip, BlipHandle, BlipStore};
pub use transform::{fit_circle, CoordinateTransformer, Point};

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

pub const RING_CLASS: &str = "grid-ring";
pub const SPOKE_CLASS: &str = "grid-spoke";

/// Minimum pick radius in pixels, so tiny blips stay clickable.
pub const HIT_SLOP: f64 = 3.0;

/// Geometry and scale settings for a plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Screen position of the plot origin, in pixels.
    pub center: Point,
    /// Plot radius in pixels.
    pub radius: f64,
    /// Range shown at the plot edge, in domain units.
    pub max_range: f64,
    /// Domain units per full rotation (360 for degrees, 6400 for mils...).
    pub turn: f64,
    /// Radians added to every mapped angle. The default puts angle 0 at the top.
    pub rotation_offset: f64,
    pub min_power: f64,
    pub max_power: f64,
    /// Blip radius in pixels at `max_power`.
    pub max_blip: f64,
    pub range_ticks: usize,
    pub angle_ticks: usize,
    pub power_response: Response,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            center: Point::new(250.0, 250.0),
            radius: 250.0,
            max_range: 256.0,
            turn: 360.0,
            rotation_offset: std::f64::consts::FRAC_PI_2,
            min_power: -128.0,
            max_power: 127.0,
            max_blip: 10.0,
            range_ticks: 4,
            angle_ticks: 8,
            power_response: Response::Sqrt,
        }
    }
}

impl PlotConfig {
    pub fn validate(&self) -> Result<(), PlotError> {
        let finite = [
            self.center.x,
            self.center.y,
            self.radius,
            self.max_range,
            self.turn,
            self.rotation_offset,
            self.min_power,
            self.max_power,
            self.max_blip,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(PlotError::InvalidConfig("all values must be finite".into()));
        }
        if self.radius <= 0.0 {
            return Err(PlotError::InvalidConfig(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if self.max_range <= 0.0 {
            return Err(PlotError::InvalidConfig(format!(
                "max_range must be positive, got {}",
                self.max_range
            )));
        }
        if self.turn <= 0.0 {
            return Err(PlotError::InvalidConfig(format!(
                "turn must be positive, got {}",
                self.turn
            )));
        }
        if self.min_power >= self.max_power {
            return Err(PlotError::InvalidConfig(format!(
                "min_power ({}) must be below max_power ({})",
                self.min_power, self.max_power
            )));
        }
        if self.max_blip <= 0.0 {
            return Err(PlotError::InvalidConfig(format!(
                "max_blip must be positive, got {}",
                self.max_blip
            )));
        }
        Ok(())
    }
}

/// Passed to the activation hook.
#[derive(Debug, Clone, Copy)]
pub struct ActivatedBlip<'a> {
    pub handle: BlipHandle,
    pub blip: &'a Blip,
}

type BlipHandler = Box<dyn FnMut(ActivatedBlip<'_>)>;
type PointerHandler = Box<dyn FnMut(Point)>;

/// Operations issued by one [`PolarPlot::render`] call, per layer group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub rings: ReconcileStats,
    pub spokes: ReconcileStats,
    pub blips: ReconcileStats,
}

impl RenderStats {
    pub fn total(&self) -> ReconcileStats {
        let mut total = self.rings;
        total += self.spokes;
        total += self.blips;
        total
    }
}

impl fmt::Display for RenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.total();
        write!(
            f,
            "+{} ~{} -{} ={}",
            t.created, t.updated, t.destroyed, t.unchanged
        )
    }
}

/// A polar plot instance.
pub struct PolarPlot {
    config: PlotConfig,
    transformer: CoordinateTransformer,
    grid: GridGeometry,
    show_grid: bool,
    store: BlipStore,
    rings: Reconciler,
    spokes: Reconciler,
    blips: Reconciler,
    crosshair: Crosshair,
    /// Last crosshair input, re-projected on render after geometry changes.
    crosshair_at: Option<(f64, f64)>,
    crosshair_stale: bool,
    on_blip_activated: Option<BlipHandler>,
    on_pointer_moved: Option<PointerHandler>,
}

impl fmt::Debug for PolarPlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolarPlot")
            .field("config", &self.config)
            .field("blips", &self.store.len())
            .field("show_grid", &self.show_grid)
            .finish_non_exhaustive()
    }
}

impl PolarPlot {
    pub fn new(config: PlotConfig) -> Result<Self, PlotError> {
        let (transformer, grid) = Self::derive(&config)?;
        Ok(Self {
            config,
            transformer,
            grid,
            show_grid: true,
            store: BlipStore::new(),
            rings: Reconciler::new(Layer::GridRings),
            spokes: Reconciler::new(Layer::GridSpokes),
            blips: Reconciler::new(Layer::Blips),
            crosshair: Crosshair::new(),
            crosshair_at: None,
            crosshair_stale: false,
            on_blip_activated: None,
            on_pointer_moved: None,
        })
    }

    fn derive(config: &PlotConfig) -> Result<(CoordinateTransformer, GridGeometry), PlotError> {
        config.validate()?;
        let scales = ScaleSet::from_config(config)?;
        let transformer = CoordinateTransformer::new(scales, config.center, config.rotation_offset);
        let grid = GridGeometry::generate(&transformer, config.range_ticks, config.angle_ticks);
        Ok((transformer, grid))
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn scales(&self) -> &ScaleSet {
        self.transformer.scales()
    }

    pub fn transformer(&self) -> &CoordinateTransformer {
        &self.transformer
    }

    pub fn grid(&self) -> &GridGeometry {
        &self.grid
    }

    /// Replace the whole configuration. On error the plot is left untouched.
    pub fn reconfigure(&mut self, config: PlotConfig) -> Result<(), PlotError> {
        let (transformer, grid) = Self::derive(&config)?;
        debug!(?config, "Plot reconfigured");
        self.config = config;
        self.transformer = transformer;
        self.grid = grid;
        self.crosshair_stale = true;
        Ok(())
    }

    /// Move the plot origin. Every derived position is re-projected on the
    /// next render.
    pub fn set_center(&mut self, center: Point) -> Result<(), PlotError> {
        self.reconfigure(PlotConfig {
            center,
            ..self.config
        })
    }

    pub fn set_rotation(&mut self, rotation_offset: f64) -> Result<(), PlotError> {
        self.reconfigure(PlotConfig {
            rotation_offset,
            ..self.config
        })
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<(), PlotError> {
        self.reconfigure(PlotConfig {
            radius,
            ..self.config
        })
    }

    pub fn set_max_range(&mut self, max_range: f64) -> Result<(), PlotError> {
        self.reconfigure(PlotConfig {
            max_range,
            ..self.config
        })
    }

    pub fn set_ticks(&mut self, range_ticks: usize, angle_ticks: usize) -> Result<(), PlotError> {
        self.reconfigure(PlotConfig {
            range_ticks,
            angle_ticks,
            ..self.config
        })
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    // --- blips ---

    pub fn add_blip(
        &mut self,
        tag: impl Into<String>,
        range: f64,
        angle: f64,
        power: f64,
    ) -> BlipHandle {
        self.store.insert(Blip::new(tag, range, angle, power))
    }

    pub fn insert_blip(&mut self, blip: Blip) -> BlipHandle {
        self.store.insert(blip)
    }

    pub fn set_blips(&mut self, blips: impl IntoIterator<Item = Blip>) -> Vec<BlipHandle> {
        self.store.replace_all(blips)
    }

    /// Remove a blip; unknown handles are ignored.
    pub fn remove_blip(&mut self, handle: BlipHandle) -> Option<Blip> {
        self.store.remove(handle)
    }

    pub fn replace_blip(&mut self, handle: BlipHandle, blip: Blip) -> Option<Blip> {
        self.store.replace(handle, blip)
    }

    pub fn clear_blips(&mut self) {
        self.store.clear();
    }

    pub fn blip(&self, handle: BlipHandle) -> Option<&Blip> {
        self.store.get(handle)
    }

    pub fn blips(&self) -> impl Iterator<Item = (BlipHandle, &Blip)> + '_ {
        self.store.iter()
    }

    pub fn blip_count(&self) -> usize {
        self.store.len()
    }

    /// Number of blip primitives alive on the surface after the last render.
    pub fn rendered_blip_count(&self) -> usize {
        self.blips.len()
    }

    // --- projection ---

    pub fn polar_to_screen(&self, angle: f64, range: f64) -> Point {
        self.transformer.polar_to_screen(angle, range)
    }

    pub fn screen_to_polar(&self, point: Point) -> (f64, f64) {
        self.transformer.screen_to_polar(point)
    }

    /// Screen circle for a blip under the current geometry. Blips with a
    /// non-finite coordinate project to a hidden primitive.
    pub fn project(&self, blip: &Blip) -> Primitive {
        if !blip.is_finite() {
            return Primitive::hidden(blip.tag.clone());
        }
        let center = self.transformer.polar_to_screen(blip.angle, blip.range);
        let radius = self.scales().power.map(blip.power);
        Primitive::circle(center, radius, blip.tag.clone())
    }

    // --- rendering ---

    /// Reconcile grid and blips against `surface`.
    pub fn render<T: RenderTarget + ?Sized>(&mut self, surface: &mut T) -> RenderStats {
        let (rings, spokes) = self.render_grid(surface);
        let blips = self.render_blips(surface);
        if self.crosshair_stale {
            if let Some(at) = self.crosshair_at {
                self.crosshair.draw(surface, &self.transformer, at);
            }
            self.crosshair_stale = false;
        }
        let stats = RenderStats {
            rings,
            spokes,
            blips,
        };
        debug!(%stats, blips = self.store.len(), "Render pass");
        stats
    }

    pub fn render_blips<T: RenderTarget + ?Sized>(&mut self, surface: &mut T) -> ReconcileStats {
        let current: Vec<(PrimitiveKey, Primitive)> = self
            .store
            .iter()
            .map(|(handle, blip)| (handle.key(), self.project(blip)))
            .collect();
        self.blips.reconcile(surface, current)
    }

    pub fn render_grid<T: RenderTarget + ?Sized>(
        &mut self,
        surface: &mut T,
    ) -> (ReconcileStats, ReconcileStats) {
        if !self.show_grid {
            return (self.rings.clear(surface), self.spokes.clear(surface));
        }
        let center = self.grid.center;
        let rings = self
            .grid
            .radii
            .iter()
            .enumerate()
            .map(|(i, &r)| (i as PrimitiveKey, Primitive::circle(center, r, RING_CLASS)));
        let ring_stats = self.rings.reconcile(surface, rings);

        let spokes = self
            .grid
            .spokes
            .iter()
            .enumerate()
            .map(|(j, s)| (j as PrimitiveKey, Primitive::line(s.from, s.to, SPOKE_CLASS)));
        let spoke_stats = self.spokes.reconcile(surface, spokes);
        (ring_stats, spoke_stats)
    }

    /// Show the crosshair at a polar coordinate; hidden at or beyond
    /// `max_range`. Returns whether it is visible.
    pub fn draw_crosshair<T: RenderTarget + ?Sized>(
        &mut self,
        surface: &mut T,
        polar: (f64, f64),
    ) -> bool {
        self.crosshair_at = Some(polar);
        self.crosshair_stale = false;
        self.crosshair.draw(surface, &self.transformer, polar)
    }

    pub fn clear_crosshair<T: RenderTarget + ?Sized>(&mut self, surface: &mut T) {
        self.crosshair_at = None;
        self.crosshair.hide(surface);
    }

    pub fn crosshair_visible(&self) -> bool {
        self.crosshair.is_visible()
    }

    /// Destroy every primitive this plot created on `surface`.
    pub fn detach<T: RenderTarget + ?Sized>(&mut self, surface: &mut T) {
        self.rings.clear(surface);
        self.spokes.clear(surface);
        self.blips.clear(surface);
        self.crosshair.remove(surface);
    }

    // --- events ---

    /// Called with the blip under the pointer by [`activate_at`](Self::activate_at).
    pub fn on_blip_activated<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(ActivatedBlip<'_>) + 'static,
    {
        self.on_blip_activated = Some(Box::new(handler));
        self
    }

    /// Called with the screen position by [`pointer_moved`](Self::pointer_moved).
    pub fn on_pointer_moved<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(Point) + 'static,
    {
        self.on_pointer_moved = Some(Box::new(handler));
        self
    }

    /// Feed a pointer position. Returns its polar coordinate.
    pub fn pointer_moved(&mut self, point: Point) -> (f64, f64) {
        let polar = self.screen_to_polar(point);
        trace!(x = point.x, y = point.y, angle = polar.0, range = polar.1, "Pointer moved");
        if let Some(handler) = self.on_pointer_moved.as_mut() {
            handler(point);
        }
        polar
    }

    /// Topmost blip whose projected circle contains `point`.
    pub fn blip_at(&self, point: Point) -> Option<BlipHandle> {
        let hits: Vec<BlipHandle> = self
            .store
            .iter()
            .filter(|(_, blip)| match self.project(blip).shape {
                Shape::Circle { center, radius } => center.distance(point) <= radius.max(HIT_SLOP),
                _ => false,
            })
            .map(|(handle, _)| handle)
            .collect();
        hits.last().copied()
    }

    /// Activate the topmost blip under `point`, dispatching the activation hook.
    pub fn activate_at(&mut self, point: Point) -> Option<BlipHandle> {
        let handle = self.blip_at(point)?;
        let blip = self.store.get(handle);
        if let (Some(handler), Some(blip)) = (self.on_blip_activated.as_mut(), blip) {
            debug!(tag = %blip.tag, "Blip activated");
            handler(ActivatedBlip { handle, blip });
        }
        Some(handle)
    }
}
