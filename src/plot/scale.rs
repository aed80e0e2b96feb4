//! Domain to pixel mappings.
//!
//! A [`Scale`] is a monotonic map from a domain interval onto a codomain
//! interval. The plot keeps three of them in a [`ScaleSet`]: range (clamped),
//! angle (extrapolating so headings wrap continuously) and power (clamped,
//! usually with a square-root response so blip area tracks magnitude).

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::{PlotConfig, PlotError};

/// Shape of the curve between domain and codomain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Linear,
    /// Square root of the normalized position; doubling the input area
    /// doubles the output area when the codomain is used as a radius.
    #[default]
    Sqrt,
}

impl Response {
    #[inline]
    fn apply(self, t: f64) -> f64 {
        match self {
            Response::Linear => t,
            // Keep sign so extrapolation stays monotonic on unclamped scales.
            Response::Sqrt => t.signum() * t.abs().sqrt(),
        }
    }

    #[inline]
    fn unapply(self, t: f64) -> f64 {
        match self {
            Response::Linear => t,
            Response::Sqrt => t.signum() * t * t,
        }
    }
}

/// A monotonic mapping between two real intervals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    domain: (f64, f64),
    codomain: (f64, f64),
    clamp: bool,
    response: Response,
}

impl Scale {
    /// Linear, unclamped scale. Fails on zero-width or non-finite intervals.
    pub fn new(domain: (f64, f64), codomain: (f64, f64)) -> Result<Self, PlotError> {
        let finite = [domain.0, domain.1, codomain.0, codomain.1]
            .iter()
            .all(|v| v.is_finite());
        if !finite || domain.0 == domain.1 || codomain.0 == codomain.1 {
            return Err(PlotError::DegenerateScale { domain, codomain });
        }
        Ok(Self {
            domain,
            codomain,
            clamp: false,
            response: Response::Linear,
        })
    }

    pub fn clamped(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn with_response(mut self, response: Response) -> Self {
        self.response = response;
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn codomain(&self) -> (f64, f64) {
        self.codomain
    }

    pub fn is_clamped(&self) -> bool {
        self.clamp
    }

    /// Map a domain value into the codomain.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (c0, c1) = self.codomain;
        let mut t = (value - d0) / (d1 - d0);
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        c0 + self.response.apply(t) * (c1 - c0)
    }

    /// Map a codomain value back into the domain.
    pub fn invert(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (c0, c1) = self.codomain;
        let mut t = (value - c0) / (c1 - c0);
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        d0 + self.response.unapply(t) * (d1 - d0)
    }
}

/// The three mappings a plot needs, rebuilt from [`PlotConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSet {
    pub range: Scale,
    pub angle: Scale,
    pub power: Scale,
}

impl ScaleSet {
    pub fn from_config(config: &PlotConfig) -> Result<Self, PlotError> {
        let range = Scale::new((0.0, config.max_range), (0.0, config.radius))?.clamped(true);
        let angle = Scale::new((0.0, config.turn), (0.0, TAU))?;
        let power = Scale::new((config.min_power, config.max_power), (0.0, config.max_blip))?
            .clamped(true)
            .with_response(config.power_response);
        Ok(Self { range, angle, power })
    }
}
