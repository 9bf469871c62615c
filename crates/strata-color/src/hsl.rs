//! RGB <-> HSL conversion and selective hue bands.
//!
//! Hue is expressed in degrees `[0, 360)`, saturation and lightness in
//! percent `[0, 100]`. Channel values are on the 0-255 scale.
//!
//! The selective HSL adjustment classifies each pixel into one of seven
//! [`HueBand`]s by its hue and applies that band's [`HslShift`].
//!
//! | Band | Hue range (degrees) |
//! |------|---------------------|
//! | Reds | `[345, 360)` and `[0, 15)` |
//! | Oranges | `[15, 45)` |
//! | Yellows | `[45, 75)` |
//! | Greens | `[75, 165)` |
//! | Cyans | `[165, 195)` |
//! | Blues | `[195, 270)` |
//! | Magentas | `[270, 345)` |

use serde::{Deserialize, Serialize};
use strata_core::pixel::{round_channel, Rgb};

/// Converts RGB (0-255) to `[hue°, saturation%, lightness%]`.
///
/// # Example
///
/// ```rust
/// use strata_color::hsl::rgb_to_hsl;
///
/// let [h, s, l] = rgb_to_hsl([0.0, 255.0, 0.0]);
/// assert!((h - 120.0).abs() < 1e-9);
/// assert!((s - 100.0).abs() < 1e-9);
/// assert!((l - 50.0).abs() < 1e-9);
/// ```
pub fn rgb_to_hsl(rgb: Rgb) -> [f64; 3] {
    let r = rgb[0] / 255.0;
    let g = rgb[1] / 255.0;
    let b = rgb[2] / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return [0.0, 0.0, l * 100.0];
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    [h / 6.0 * 360.0, s * 100.0, l * 100.0]
}

#[inline]
fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// Converts `[hue°, saturation%, lightness%]` to whole RGB channel values.
///
/// Output channels are rounded to the nearest integer.
pub fn hsl_to_rgb(hsl: [f64; 3]) -> [u8; 3] {
    let h = hsl[0] / 360.0;
    let s = hsl[1] / 100.0;
    let l = hsl[2] / 100.0;

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    [
        round_channel(r * 255.0),
        round_channel(g * 255.0),
        round_channel(b * 255.0),
    ]
}

/// One of the seven named hue ranges used for selective adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HueBand {
    /// `[345, 360)` and `[0, 15)`
    Reds,
    /// `[15, 45)`
    Oranges,
    /// `[45, 75)`
    Yellows,
    /// `[75, 165)`
    Greens,
    /// `[165, 195)`
    Cyans,
    /// `[195, 270)`
    Blues,
    /// `[270, 345)`
    Magentas,
}

impl HueBand {
    /// All bands in hue order, starting at red.
    pub const ALL: [HueBand; 7] = [
        HueBand::Reds,
        HueBand::Oranges,
        HueBand::Yellows,
        HueBand::Greens,
        HueBand::Cyans,
        HueBand::Blues,
        HueBand::Magentas,
    ];
}

/// Classifies a hue (degrees) into its [`HueBand`].
///
/// Values outside `[0, 360)` (including NaN) fall back to reds.
pub fn hue_band(hue: f64) -> HueBand {
    match hue {
        h if (15.0..45.0).contains(&h) => HueBand::Oranges,
        h if (45.0..75.0).contains(&h) => HueBand::Yellows,
        h if (75.0..165.0).contains(&h) => HueBand::Greens,
        h if (165.0..195.0).contains(&h) => HueBand::Cyans,
        h if (195.0..270.0).contains(&h) => HueBand::Blues,
        h if (270.0..345.0).contains(&h) => HueBand::Magentas,
        _ => HueBand::Reds,
    }
}

/// Hue rotation plus saturation/lightness deltas for one band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HslShift {
    /// Hue rotation in degrees.
    pub hue: f64,
    /// Saturation delta in percent points.
    pub saturation: f64,
    /// Lightness delta in percent points.
    pub lightness: f64,
}

impl HslShift {
    /// Returns `true` if all three components are zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.hue == 0.0 && self.saturation == 0.0 && self.lightness == 0.0
    }

    /// Applies this shift to an `[h, s, l]` triple.
    ///
    /// Hue wraps into `[0, 360)`; saturation and lightness clamp to `[0, 100]`.
    #[inline]
    pub fn apply(&self, hsl: [f64; 3]) -> [f64; 3] {
        [
            (hsl[0] + self.hue).rem_euclid(360.0),
            (hsl[1] + self.saturation).clamp(0.0, 100.0),
            (hsl[2] + self.lightness).clamp(0.0, 100.0),
        ]
    }
}

/// Per-band HSL shifts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HslAdjustments {
    /// Reds band.
    pub reds: HslShift,
    /// Oranges band.
    pub oranges: HslShift,
    /// Yellows band.
    pub yellows: HslShift,
    /// Greens band.
    pub greens: HslShift,
    /// Cyans band.
    pub cyans: HslShift,
    /// Blues band.
    pub blues: HslShift,
    /// Magentas band.
    pub magentas: HslShift,
}

impl HslAdjustments {
    /// Shift for `band`.
    pub fn get(&self, band: HueBand) -> &HslShift {
        match band {
            HueBand::Reds => &self.reds,
            HueBand::Oranges => &self.oranges,
            HueBand::Yellows => &self.yellows,
            HueBand::Greens => &self.greens,
            HueBand::Cyans => &self.cyans,
            HueBand::Blues => &self.blues,
            HueBand::Magentas => &self.magentas,
        }
    }

    /// Mutable shift for `band`.
    pub fn get_mut(&mut self, band: HueBand) -> &mut HslShift {
        match band {
            HueBand::Reds => &mut self.reds,
            HueBand::Oranges => &mut self.oranges,
            HueBand::Yellows => &mut self.yellows,
            HueBand::Greens => &mut self.greens,
            HueBand::Cyans => &mut self.cyans,
            HueBand::Blues => &mut self.blues,
            HueBand::Magentas => &mut self.magentas,
        }
    }

    /// Returns a copy with `band` replaced.
    pub fn with(mut self, band: HueBand, shift: HslShift) -> Self {
        *self.get_mut(band) = shift;
        self
    }

    /// Returns `true` if no band carries a shift.
    pub fn is_neutral(&self) -> bool {
        HueBand::ALL.iter().all(|&band| self.get(band).is_zero())
    }

    /// Selective HSL on one pixel.
    ///
    /// The input is clamped to `[0, 255]` before conversion; the result is
    /// whole channel values.
    pub fn apply(&self, rgb: Rgb) -> Rgb {
        let clamped = [
            rgb[0].clamp(0.0, 255.0),
            rgb[1].clamp(0.0, 255.0),
            rgb[2].clamp(0.0, 255.0),
        ];
        let hsl = rgb_to_hsl(clamped);
        let shifted = self.get(hue_band(hsl[0])).apply(hsl);
        let [r, g, b] = hsl_to_rgb(shifted);
        [r as f64, g as f64, b as f64]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_primaries_to_hsl() {
        let [h, s, l] = rgb_to_hsl([255.0, 0.0, 0.0]);
        assert_relative_eq!(h, 0.0);
        assert_relative_eq!(s, 100.0);
        assert_relative_eq!(l, 50.0);

        let [h, _, _] = rgb_to_hsl([0.0, 0.0, 255.0]);
        assert_relative_eq!(h, 240.0, epsilon = 1e-9);

        let [h, s, l] = rgb_to_hsl([128.0, 128.0, 128.0]);
        assert_eq!((h, s), (0.0, 0.0));
        assert_relative_eq!(l, 128.0 / 255.0 * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hsl_roundtrip_within_one() {
        for r in (0..=255).step_by(15) {
            for g in (0..=255).step_by(17) {
                for b in (0..=255).step_by(13) {
                    let src = [r as f64, g as f64, b as f64];
                    let back = hsl_to_rgb(rgb_to_hsl(src));
                    for c in 0..3 {
                        let diff = (back[c] as i32 - src[c] as i32).abs();
                        assert!(diff <= 1, "{src:?} -> {back:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_hue_band_boundaries() {
        assert_eq!(hue_band(0.0), HueBand::Reds);
        assert_eq!(hue_band(14.999), HueBand::Reds);
        assert_eq!(hue_band(15.0), HueBand::Oranges);
        assert_eq!(hue_band(45.0), HueBand::Yellows);
        assert_eq!(hue_band(75.0), HueBand::Greens);
        assert_eq!(hue_band(164.9), HueBand::Greens);
        assert_eq!(hue_band(165.0), HueBand::Cyans);
        assert_eq!(hue_band(195.0), HueBand::Blues);
        assert_eq!(hue_band(270.0), HueBand::Magentas);
        assert_eq!(hue_band(344.9), HueBand::Magentas);
        assert_eq!(hue_band(345.0), HueBand::Reds);
        assert_eq!(hue_band(359.9), HueBand::Reds);
    }

    #[test]
    fn test_shift_wraps_and_clamps() {
        let shift = HslShift { hue: -30.0, saturation: 50.0, lightness: -80.0 };
        let out = shift.apply([10.0, 70.0, 40.0]);
        assert_relative_eq!(out[0], 340.0);
        assert_eq!(out[1], 100.0);
        assert_eq!(out[2], 0.0);
    }

    #[test]
    fn test_selective_only_touches_band() {
        let adj = HslAdjustments::default().with(
            HueBand::Blues,
            HslShift { hue: 0.0, saturation: -100.0, lightness: 0.0 },
        );
        assert!(!adj.is_neutral());

        // Pure red is untouched.
        assert_eq!(adj.apply([255.0, 0.0, 0.0]), [255.0, 0.0, 0.0]);

        // Pure blue loses all saturation.
        let out = adj.apply([0.0, 0.0, 255.0]);
        assert_eq!(out[0], out[1]);
        assert_eq!(out[1], out[2]);
    }

    #[test]
    fn test_serde_band_names() {
        let json = serde_json::json!({ "greens": { "hue": 12.0 } });
        let adj: HslAdjustments = serde_json::from_value(json).unwrap();
        assert_eq!(adj.greens.hue, 12.0);
        assert!(adj.reds.is_zero());
    }
}
