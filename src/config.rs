use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cli::Args;
use crate::color::ColorScheme;
use crate::plot::{Blip, PlotConfig};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub plot: PlotConfig,
    /// Blips loaded into the plot at startup.
    pub blips: Vec<Blip>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub fps: u32,
    pub color_scheme: ColorScheme,
    pub show_grid: bool,
    /// Recompute center and radius from the drawable area on start and resize.
    pub fit_to_area: bool,
    pub opacity: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            color_scheme: ColorScheme::Phosphor,
            show_grid: true,
            fit_to_area: true,
            opacity: 1.0,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config at {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check the `[plot]` section and reject blips with non-finite fields.
    pub fn validate(&self) -> Result<()> {
        self.plot.validate().context("Invalid [plot] section")?;
        if let Some((i, blip)) = self.blips.iter().enumerate().find(|(_, b)| !b.is_finite()) {
            anyhow::bail!(
                "Blip {} ({:?}) has a non-finite range, angle or power",
                i,
                blip.tag
            );
        }
        Ok(())
    }

    /// Get the default XDG config path (~/.config/polarscope/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("polarscope").join("config.toml"))
    }

    /// Load config from the default XDG path if it exists.
    /// Returns None if the file doesn't exist, warns on parse errors.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            return None;
        }
        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("{:#}. Using defaults.", e);
                None
            }
        }
    }

    /// Initialize default config file at XDG path, returns the path
    pub fn init_default_config() -> Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, Self::generate_config_template())?;

        Ok(path)
    }

    /// Blips shown when no config provides any.
    pub fn demo_blips() -> Vec<Blip> {
        vec![
            Blip::new("friendly", 60.0, 30.0, 40.0),
            Blip::new("friendly", 150.0, 300.0, 90.0),
            Blip::new("hostile", 200.0, 120.0, 127.0),
            Blip::new("unknown", 100.0, 210.0, -20.0),
            Blip::new("unknown", 240.0, 75.0, -100.0),
        ]
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r#"# Polarscope Configuration
# This file is auto-generated. Edit as needed.

[display]
# Frames per second for the terminal view
fps = 30
# Color scheme: "phosphor", "amber", "spectrum", "ocean", "monochrome"
color_scheme = "phosphor"
# Draw range rings and angle spokes
show_grid = true
# Fit center and radius to the terminal (ignores plot.center / plot.radius)
fit_to_area = true
# Opacity level (0.0-1.0)
opacity = 1.0

[plot]
# Screen position of the plot origin and radius, in pixels
center = { x = 250.0, y = 250.0 }
radius = 250.0
# Range shown at the plot edge
max_range = 256.0
# Domain units per full rotation (360 = degrees)
turn = 360.0
# Radians added to every angle; pi/2 puts angle 0 at the top
rotation_offset = 1.5707963267948966
# Power bounds and blip radius (pixels) at max_power
min_power = -128.0
max_power = 127.0
max_blip = 10.0
# Power to size curve: "sqrt" (area tracks power) or "linear"
power_response = "sqrt"
# Grid graduations
range_ticks = 4
angle_ticks = 8

# Blips loaded at startup
[[blips]]
tag = "friendly"
range = 60.0
angle = 30.0
power = 40.0

[[blips]]
tag = "hostile"
range = 200.0
angle = 120.0
power = 127.0

[[blips]]
tag = "unknown"
range = 100.0
angle = 210.0
power = -20.0
"#
        .to_string()
    }

    /// Merge CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &Args) {
        if let Some(ref colors) = args.colors {
            match colors.parse() {
                Ok(scheme) => self.display.color_scheme = scheme,
                Err(e) => warn!("{}", e),
            }
        }
        if args.no_grid {
            self.display.show_grid = false;
        }
        if let Some(fps) = args.fps {
            self.display.fps = fps.max(1);
        }
        if let Some(opacity) = args.opacity {
            self.display.opacity = opacity.clamp(0.0, 1.0);
        }

        if let Some(max_range) = args.max_range {
            self.plot.max_range = max_range;
        }
        if let Some(turn) = args.turn {
            self.plot.turn = turn;
        }
        if let Some(rotation) = args.rotation {
            self.plot.rotation_offset = rotation;
        }
        if let Some(ticks) = args.range_ticks {
            self.plot.range_ticks = ticks;
        }
        if let Some(ticks) = args.angle_ticks {
            self.plot.angle_ticks = ticks;
        }
    }
}
