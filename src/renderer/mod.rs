//! Retained raster surface
//!
//! [`Scene`] implements [`RenderTarget`]: it keeps every primitive the plot
//! creates, per layer and in creation order, and rasterizes them into an
//! owned RGBA pixel buffer ([`Canvas`]). Output backends (the terminal
//! half-block view) convert the canvas at submission time.

pub mod raster;

use std::collections::HashMap;

use crate::color::{lerp_color, ColorScheme};
use crate::plot::{Layer, Primitive, PrimitiveKey, RenderTarget, Shape};

/// Owned RGBA pixel buffer.
///
/// Internal format is 4 bytes per pixel in **RGBA** order, pre-multiplied.
pub struct Canvas {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0u8; width * height * 4],
            width,
            height,
        }
    }

    /// Resize the canvas, reallocating only when the buffer is too small.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        let needed = width * height * 4;
        if self.data.len() < needed {
            self.data.resize(needed, 0);
        }
    }

    /// Clear the canvas to fully transparent black.
    #[inline]
    pub fn clear(&mut self) {
        let len = self.width * self.height * 4;
        self.data[..len].fill(0);
    }

    /// Write a pixel at (x, y) with the given color and opacity.
    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8, opacity: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) * 4;
        let a = (opacity * 255.0) as u8;
        self.data[idx] = (r as f32 * opacity) as u8;
        self.data[idx + 1] = (g as f32 * opacity) as u8;
        self.data[idx + 2] = (b as f32 * opacity) as u8;
        self.data[idx + 3] = a;
    }

    /// Read the RGBA values at (x, y). Returns (r, g, b, a), pre-multiplied.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> (u8, u8, u8, u8) {
        if x >= self.width || y >= self.height {
            return (0, 0, 0, 0);
        }
        let idx = (y * self.width + x) * 4;
        (self.data[idx], self.data[idx + 1], self.data[idx + 2], self.data[idx + 3])
    }
}

/// Colors and opacity used when rasterizing a [`Scene`].
#[derive(Debug, Clone, Copy)]
pub struct RenderStyle {
    pub color_scheme: ColorScheme,
    pub opacity: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::default(),
            opacity: 1.0,
        }
    }
}

struct Entry {
    seq: u64,
    primitive: Primitive,
}

/// Primitives retained per layer.
#[derive(Default)]
pub struct Scene {
    layers: [HashMap<PrimitiveKey, Entry>; 5],
    next_seq: u64,
}

fn slot(layer: Layer) -> usize {
    match layer {
        Layer::GridRings => 0,
        Layer::GridSpokes => 1,
        Layer::Blips => 2,
        Layer::CrosshairRing => 3,
        Layer::CrosshairLine => 4,
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, layer: Layer) -> usize {
        self.layers[slot(layer)].len()
    }

    pub fn total(&self) -> usize {
        self.layers.iter().map(|l| l.len()).sum()
    }

    pub fn get(&self, layer: Layer, key: PrimitiveKey) -> Option<&Primitive> {
        self.layers[slot(layer)].get(&key).map(|e| &e.primitive)
    }

    /// Primitives of one layer in creation order.
    pub fn primitives(&self, layer: Layer) -> Vec<&Primitive> {
        let mut entries: Vec<&Entry> = self.layers[slot(layer)].values().collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| &e.primitive).collect()
    }

    /// Draw every layer, bottom to top, onto a cleared canvas.
    pub fn rasterize(&self, canvas: &mut Canvas, style: &RenderStyle) {
        canvas.clear();
        let scheme = style.color_scheme;
        let grid = scheme.grid_color();
        let cross = scheme.crosshair_color();

        for layer in Layer::ALL {
            let primitives = self.primitives(layer);
            let count = primitives.len();
            for (i, primitive) in primitives.into_iter().enumerate() {
                let (rgb, opacity) = match layer {
                    // Outermost ring a little brighter to mark the plot edge.
                    Layer::GridRings if i + 1 == count => {
                        (lerp_color(grid, cross, 0.3), style.opacity)
                    }
                    Layer::GridRings | Layer::GridSpokes => (grid, style.opacity * 0.8),
                    Layer::Blips => (scheme.class_color(&primitive.class, 0.8), style.opacity),
                    Layer::CrosshairRing | Layer::CrosshairLine => (cross, style.opacity * 0.7),
                };
                match primitive.shape {
                    Shape::Circle { center, radius } => {
                        if layer == Layer::Blips {
                            raster::fill_circle(canvas, center.x, center.y, radius, rgb, opacity);
                        } else {
                            raster::stroke_circle(canvas, center.x, center.y, radius, rgb, opacity);
                        }
                    }
                    Shape::Line { from, to } => {
                        raster::line(canvas, (from.x, from.y), (to.x, to.y), rgb, opacity);
                    }
                    Shape::Hidden => {}
                }
            }
        }
    }
}

impl RenderTarget for Scene {
    fn create(&mut self, layer: Layer, key: PrimitiveKey, primitive: &Primitive) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.layers[slot(layer)].insert(
            key,
            Entry {
                seq,
                primitive: primitive.clone(),
            },
        );
    }

    fn update(&mut self, layer: Layer, key: PrimitiveKey, primitive: &Primitive) {
        if let Some(entry) = self.layers[slot(layer)].get_mut(&key) {
            entry.primitive = primitive.clone();
        }
    }

    fn destroy(&mut self, layer: Layer, key: PrimitiveKey) {
        self.layers[slot(layer)].remove(&key);
    }
}
