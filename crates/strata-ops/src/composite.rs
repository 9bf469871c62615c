//! Blend modes and source-over compositing.
//!
//! Follows the W3C Compositing and Blending model on straight-alpha input.
//! For a source pixel `Cs, αs` drawn onto a backdrop `Cb, αb`:
//!
//! ```text
//! Cs' = (1 - αb) * Cs + αb * B(Cb, Cs)        mix the blend result by backdrop coverage
//! αo  = αs + αb * (1 - αs)                    source-over
//! Co  = (αs * Cs' + αb * Cb * (1 - αs)) / αo
//! ```
//!
//! All twelve modes are separable, so `B` is applied per channel on the
//! `[0, 1]` scale.
//!
//! # Example
//!
//! ```rust
//! use strata_ops::composite::{blend_channel, BlendMode};
//!
//! assert!((blend_channel(BlendMode::Multiply, 0.5, 0.5) - 0.25).abs() < 1e-12);
//! assert_eq!("color-dodge".parse::<BlendMode>().unwrap(), BlendMode::ColorDodge);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_core::pixel::round_channel;
use strata_core::{RgbaImage, CHANNELS};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};

/// Straight-alpha RGBA on the `[0, 1]` scale.
pub type UnitRgba = [f64; 4];

/// Blend mode, named after the canvas composite operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Plain source-over.
    #[default]
    SourceOver,
    /// `Cb * Cs`
    Multiply,
    /// `Cb + Cs - Cb * Cs`
    Screen,
    /// Hard light with layers swapped.
    Overlay,
    /// `min(Cb, Cs)`
    Darken,
    /// `max(Cb, Cs)`
    Lighten,
    /// Brightens the backdrop by the source.
    ColorDodge,
    /// Darkens the backdrop by the source.
    ColorBurn,
    /// Multiply or screen depending on the source.
    HardLight,
    /// Soft version of hard light.
    SoftLight,
    /// `|Cb - Cs|`
    Difference,
    /// `Cb + Cs - 2 * Cb * Cs`
    Exclusion,
}

impl BlendMode {
    /// Every mode, in menu order.
    pub const ALL: [BlendMode; 12] = [
        BlendMode::SourceOver,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
    ];

    /// Serialized name (`"source-over"`, `"color-dodge"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            BlendMode::SourceOver => "source-over",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            BlendMode::SourceOver => "Normal",
            BlendMode::Multiply => "Multiply",
            BlendMode::Screen => "Screen",
            BlendMode::Overlay => "Overlay",
            BlendMode::Darken => "Darken",
            BlendMode::Lighten => "Lighten",
            BlendMode::ColorDodge => "Color Dodge",
            BlendMode::ColorBurn => "Color Burn",
            BlendMode::HardLight => "Hard Light",
            BlendMode::SoftLight => "Soft Light",
            BlendMode::Difference => "Difference",
            BlendMode::Exclusion => "Exclusion",
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = OpsError;

    fn from_str(s: &str) -> OpsResult<Self> {
        let key = s.trim().to_ascii_lowercase();
        if key == "normal" {
            return Ok(BlendMode::SourceOver);
        }
        BlendMode::ALL
            .into_iter()
            .find(|m| m.name() == key)
            .ok_or_else(|| OpsError::UnknownBlendMode(s.to_string()))
    }
}

#[inline]
fn hard_light(cb: f64, cs: f64) -> f64 {
    if cs <= 0.5 {
        cb * 2.0 * cs
    } else {
        let s = 2.0 * cs - 1.0;
        cb + s - cb * s
    }
}

/// Separable blend function `B(Cb, Cs)` on `[0, 1]` values.
#[inline]
pub fn blend_channel(mode: BlendMode, cb: f64, cs: f64) -> f64 {
    match mode {
        BlendMode::SourceOver => cs,
        BlendMode::Multiply => cb * cs,
        BlendMode::Screen => cb + cs - cb * cs,
        BlendMode::Overlay => hard_light(cs, cb),
        BlendMode::Darken => cb.min(cs),
        BlendMode::Lighten => cb.max(cs),
        BlendMode::ColorDodge => {
            if cb == 0.0 {
                0.0
            } else if cs >= 1.0 {
                1.0
            } else {
                (cb / (1.0 - cs)).min(1.0)
            }
        }
        BlendMode::ColorBurn => {
            if cb >= 1.0 {
                1.0
            } else if cs <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - cb) / cs).min(1.0)
            }
        }
        BlendMode::HardLight => hard_light(cb, cs),
        BlendMode::SoftLight => {
            if cs <= 0.5 {
                cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
            } else {
                let d = if cb <= 0.25 {
                    ((16.0 * cb - 12.0) * cb + 4.0) * cb
                } else {
                    cb.sqrt()
                };
                cb + (2.0 * cs - 1.0) * (d - cb)
            }
        }
        BlendMode::Difference => (cb - cs).abs(),
        BlendMode::Exclusion => cb + cs - 2.0 * cb * cs,
    }
}

/// Blends and composites one source pixel onto a backdrop pixel.
///
/// Both inputs and the result are straight-alpha [`UnitRgba`].
#[inline]
pub fn blend_pixel(src: UnitRgba, dst: UnitRgba, mode: BlendMode) -> UnitRgba {
    let a_s = src[3];
    let a_b = dst[3];
    let a_o = a_s + a_b * (1.0 - a_s);
    if a_o <= 0.0 {
        return [0.0; 4];
    }

    let mut out = [0.0, 0.0, 0.0, a_o];
    for c in 0..3 {
        let cs = if mode == BlendMode::SourceOver {
            src[c]
        } else {
            (1.0 - a_b) * src[c] + a_b * blend_channel(mode, dst[c], src[c])
        };
        out[c] = (a_s * cs + a_b * dst[c] * (1.0 - a_s)) / a_o;
    }
    out
}

/// Converts an RGBA8 pixel to [`UnitRgba`].
#[inline]
pub fn to_unit(px: [u8; 4]) -> UnitRgba {
    [
        px[0] as f64 / 255.0,
        px[1] as f64 / 255.0,
        px[2] as f64 / 255.0,
        px[3] as f64 / 255.0,
    ]
}

/// Rounds a [`UnitRgba`] back to RGBA8.
#[inline]
pub fn from_unit(px: UnitRgba) -> [u8; 4] {
    [
        round_channel(px[0] * 255.0),
        round_channel(px[1] * 255.0),
        round_channel(px[2] * 255.0),
        round_channel(px[3] * 255.0),
    ]
}

/// Draws `src` onto `dst` pixel-for-pixel with `opacity` and `mode`.
///
/// Fully transparent source pixels leave the destination untouched.
///
/// # Errors
///
/// Returns an error if the two buffers differ in size.
pub fn composite(dst: &mut RgbaImage, src: &RgbaImage, opacity: f64, mode: BlendMode) -> OpsResult<()> {
    dst.ensure_same_size(src)?;
    let (w, h) = dst.dimensions();
    trace!(width = w, height = h, %mode, opacity, "composite::composite");

    let opacity = opacity.clamp(0.0, 1.0);
    if opacity == 0.0 {
        return Ok(());
    }
    for (d, s) in dst
        .as_raw_mut()
        .chunks_exact_mut(CHANNELS)
        .zip(src.as_raw().chunks_exact(CHANNELS))
    {
        if s[3] == 0 {
            continue;
        }
        let mut sp = to_unit([s[0], s[1], s[2], s[3]]);
        sp[3] *= opacity;
        let out = from_unit(blend_pixel(sp, to_unit([d[0], d[1], d[2], d[3]]), mode));
        d.copy_from_slice(&out);
    }
    Ok(())
}
