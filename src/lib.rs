//! Polar (radar-style) blip display.
//!
//! The [`plot`] module holds the rendering-agnostic core: scales, polar to
//! screen transforms, grid geometry, the blip store and the reconciler that
//! drives any [`plot::RenderTarget`]. [`renderer`] provides a raster target
//! and [`display`] a terminal front end built on it.

pub mod cli;
pub mod color;
pub mod config;
pub mod display;
pub mod plot;
pub mod renderer;

pub use plot::{Blip, BlipHandle, PlotConfig, PlotError, Point, PolarPlot};
