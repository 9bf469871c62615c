//! Pixel-level constants and channel helpers.
//!
//! All color math in strata works on `[f64; 3]` channel triples on the
//! 0-255 scale. Values are allowed to leave that range between pipeline
//! stages; they are clamped (and rounded) only where a stage needs an
//! integer or bounded input, and once more at final output.
//!
//! # Used By
//!
//! - `strata-color` - luma-based saturation, vibrance, color balance, presets
//! - `strata-ops` - pipeline quantization points

/// RGB channel triple on the 0-255 scale, unclamped.
pub type Rgb = [f64; 3];

// ============================================================================
// Rec.709 Luminance Constants
// ============================================================================

/// Rec.709 luminance coefficient for red channel.
///
/// Used in the standard luminance formula: `Y = 0.2126*R + 0.7152*G + 0.0722*B`
pub const REC709_LUMA_R: f64 = 0.2126;

/// Rec.709 luminance coefficient for green channel.
pub const REC709_LUMA_G: f64 = 0.7152;

/// Rec.709 luminance coefficient for blue channel.
pub const REC709_LUMA_B: f64 = 0.0722;

/// Rec.709 luminance coefficients as an array [R, G, B].
pub const REC709_LUMA: [f64; 3] = [REC709_LUMA_R, REC709_LUMA_G, REC709_LUMA_B];

/// Rec.709 luma of an RGB triple, on the same scale as the input.
///
/// # Example
/// ```
/// use strata_core::pixel::luma;
/// let y = luma([255.0, 255.0, 255.0]);
/// assert!((y - 255.0).abs() < 1e-9);
/// ```
#[inline]
pub fn luma(rgb: Rgb) -> f64 {
    rgb[0] * REC709_LUMA_R + rgb[1] * REC709_LUMA_G + rgb[2] * REC709_LUMA_B
}

/// Clamps a channel value to `[0, 255]` without rounding.
#[inline]
pub fn clamp_channel(v: f64) -> f64 {
    v.clamp(0.0, 255.0)
}

/// Rounds a channel to the nearest integer and clamps it into a `u8`.
///
/// NaN maps to 0.
///
/// # Example
/// ```
/// use strata_core::pixel::round_channel;
/// assert_eq!(round_channel(254.5), 255);
/// assert_eq!(round_channel(-3.0), 0);
/// assert_eq!(round_channel(300.0), 255);
/// ```
#[inline]
pub fn round_channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Rounds and clamps each channel of an RGB triple.
#[inline]
pub fn round_rgb(rgb: Rgb) -> [u8; 3] {
    [round_channel(rgb[0]), round_channel(rgb[1]), round_channel(rgb[2])]
}

/// Clamps each channel of an RGB triple to `[0, 255]`.
#[inline]
pub fn clamp_rgb(rgb: Rgb) -> Rgb {
    [clamp_channel(rgb[0]), clamp_channel(rgb[1]), clamp_channel(rgb[2])]
}
