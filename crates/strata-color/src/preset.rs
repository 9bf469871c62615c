//! Named preset looks.
//!
//! A preset is a fixed per-pixel transform. The pipeline feeds it a clamped
//! pixel and blends the result with that pixel by the filter intensity, see
//! [`Preset::apply`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_core::pixel::{luma, Rgb};

use crate::error::{ColorError, ColorResult};

/// Preset filter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// No preset.
    #[default]
    None,
    /// Rec.709 luma.
    Grayscale,
    /// Classic sepia matrix.
    Sepia,
    /// Lifted, warm, low-blue.
    Vintage,
    /// Blue push.
    Cool,
    /// Red push, blue cut.
    Warm,
    /// 1.5x contrast around 128.
    Dramatic,
    /// Lifted blacks, compressed range.
    Fade,
    /// High-contrast grayscale.
    Noir,
    /// Magenta/blue push, green cut.
    Cyberpunk,
    /// Orange push, blue cut.
    Sunset,
}

impl Preset {
    /// Every preset, `None` first.
    pub const ALL: [Preset; 11] = [
        Preset::None,
        Preset::Grayscale,
        Preset::Sepia,
        Preset::Vintage,
        Preset::Cool,
        Preset::Warm,
        Preset::Dramatic,
        Preset::Fade,
        Preset::Noir,
        Preset::Cyberpunk,
        Preset::Sunset,
    ];

    /// Serialized name.
    pub fn name(self) -> &'static str {
        match self {
            Preset::None => "none",
            Preset::Grayscale => "grayscale",
            Preset::Sepia => "sepia",
            Preset::Vintage => "vintage",
            Preset::Cool => "cool",
            Preset::Warm => "warm",
            Preset::Dramatic => "dramatic",
            Preset::Fade => "fade",
            Preset::Noir => "noir",
            Preset::Cyberpunk => "cyberpunk",
            Preset::Sunset => "sunset",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Preset::None => "None",
            Preset::Grayscale => "Grayscale",
            Preset::Sepia => "Sepia",
            Preset::Vintage => "Vintage",
            Preset::Cool => "Cool",
            Preset::Warm => "Warm",
            Preset::Dramatic => "Dramatic",
            Preset::Fade => "Fade",
            Preset::Noir => "Noir",
            Preset::Cyberpunk => "Cyberpunk",
            Preset::Sunset => "Sunset",
        }
    }

    /// Returns `true` for [`Preset::None`].
    #[inline]
    pub fn is_none(self) -> bool {
        self == Preset::None
    }

    /// Raw preset transform, without intensity blending.
    ///
    /// Expects a clamped pixel. `None` returns its input.
    pub fn transform(self, rgb: Rgb) -> Rgb {
        let [r, g, b] = rgb;
        match self {
            Preset::None => rgb,
            Preset::Grayscale => {
                let y = luma(rgb);
                [y, y, y]
            }
            Preset::Sepia => [
                (r * 0.393 + g * 0.769 + b * 0.189).min(255.0),
                (r * 0.349 + g * 0.686 + b * 0.168).min(255.0),
                (r * 0.272 + g * 0.534 + b * 0.131).min(255.0),
            ],
            Preset::Vintage => [
                (r * 0.9 + 40.0).min(255.0),
                (g * 0.8 + 20.0).min(255.0),
                (b * 0.6 + 10.0).min(255.0),
            ],
            Preset::Cool => [r * 0.9, g * 0.95, (b * 1.15 + 10.0).min(255.0)],
            Preset::Warm => [(r * 1.1 + 10.0).min(255.0), g, b * 0.85],
            Preset::Dramatic => [
                1.5 * (r - 128.0) + 128.0,
                1.5 * (g - 128.0) + 128.0,
                1.5 * (b - 128.0) + 128.0,
            ],
            Preset::Fade => [r * 0.8 + 30.0, g * 0.8 + 30.0, b * 0.8 + 30.0],
            Preset::Noir => {
                let v = 1.4 * (luma(rgb) - 128.0) + 128.0;
                [v, v, v]
            }
            Preset::Cyberpunk => [
                (r * 1.2 + 20.0).min(255.0),
                g * 0.7,
                (b * 1.3 + 30.0).min(255.0),
            ],
            Preset::Sunset => [
                (r * 1.15 + 15.0).min(255.0),
                (g * 0.9 + 10.0).min(255.0),
                b * 0.75,
            ],
        }
    }

    /// Preset transform blended with its input by `intensity` (0-100).
    ///
    /// `out = c + (preset(c) - c) * intensity / 100`
    pub fn apply(self, rgb: Rgb, intensity: f64) -> Rgb {
        if self.is_none() {
            return rgb;
        }
        let f = self.transform(rgb);
        let t = intensity / 100.0;
        [
            rgb[0] + (f[0] - rgb[0]) * t,
            rgb[1] + (f[1] - rgb[1]) * t,
            rgb[2] + (f[2] - rgb[2]) * t,
        ]
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ColorError;

    fn from_str(s: &str) -> ColorResult<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| ColorError::UnknownPreset(s.to_string()))
    }
}
