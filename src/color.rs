use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Green CRT phosphor
    #[default]
    Phosphor,
    Amber,
    Spectrum,
    Ocean,
    Monochrome,
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "phosphor" | "green" => Ok(Self::Phosphor),
            "amber" => Ok(Self::Amber),
            "spectrum" => Ok(Self::Spectrum),
            "ocean" => Ok(Self::Ocean),
            "mono" | "monochrome" => Ok(Self::Monochrome),
            _ => Err(format!("Unknown color scheme: {}", s)),
        }
    }
}

impl ColorScheme {
    /// Get color for a given position (0.0 to 1.0) and intensity (0.0 to 1.0)
    pub fn get_color(&self, position: f32, intensity: f32) -> (u8, u8, u8) {
        let intensity = intensity.clamp(0.0, 1.0);
        let (h, s, l) = match self {
            ColorScheme::Phosphor => {
                // Narrow band around green so classes stay distinguishable
                let hue = 100.0 + position * 60.0;
                (hue, 0.85, 0.25 + intensity * 0.4)
            }
            ColorScheme::Amber => {
                let hue = 25.0 + position * 30.0;
                (hue, 0.95, 0.25 + intensity * 0.4)
            }
            ColorScheme::Spectrum => {
                let hue = 270.0 - (position * 270.0);
                (hue, 0.9, 0.35 + intensity * 0.3)
            }
            ColorScheme::Ocean => {
                let hue = 180.0 + position * 60.0;
                (hue, 0.8, 0.3 + intensity * 0.35)
            }
            ColorScheme::Monochrome => (0.0, 0.0, 0.3 + intensity * 0.6),
        };

        let hsl = Hsl::new(h, s, l);
        let rgb: Srgb = hsl.into_color();

        (
            (rgb.red * 255.0) as u8,
            (rgb.green * 255.0) as u8,
            (rgb.blue * 255.0) as u8,
        )
    }

    /// Dim color for range rings and spokes.
    pub fn grid_color(&self) -> (u8, u8, u8) {
        self.get_color(0.0, 0.0)
    }

    pub fn crosshair_color(&self) -> (u8, u8, u8) {
        self.get_color(0.5, 1.0)
    }

    /// Stable color for a blip class. Equal tags always get equal colors.
    pub fn class_color(&self, class: &str, intensity: f32) -> (u8, u8, u8) {
        self.get_color(class_position(class), intensity)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorScheme::Phosphor => "phosphor",
            ColorScheme::Amber => "amber",
            ColorScheme::Spectrum => "spectrum",
            ColorScheme::Ocean => "ocean",
            ColorScheme::Monochrome => "monochrome",
        }
    }

    pub fn all() -> &'static [ColorScheme] {
        &[
            ColorScheme::Phosphor,
            ColorScheme::Amber,
            ColorScheme::Spectrum,
            ColorScheme::Ocean,
            ColorScheme::Monochrome,
        ]
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        let current = all.iter().position(|c| c == self).unwrap_or(0);
        all[(current + 1) % all.len()]
    }
}

/// Map a class name onto `[0, 1)` with FNV-1a so it does not depend on
/// the process hasher.
fn class_position(class: &str) -> f32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in class.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    (hash % 1024) as f32 / 1024.0
}

/// Interpolate between two colors
pub fn lerp_color(a: (u8, u8, u8), b: (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    (
        (a.0 as f32 + (b.0 as f32 - a.0 as f32) * t) as u8,
        (a.1 as f32 + (b.1 as f32 - a.1 as f32) * t) as u8,
        (a.2 as f32 + (b.2 as f32 - a.2 as f32) * t) as u8,
    )
}
