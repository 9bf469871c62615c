//! Tonal-range color balance.
//!
//! Each pixel is split into shadow, midtone and highlight weights by its
//! normalized Rec.709 luma, and each range's (cyan-red, magenta-green,
//! yellow-blue) shift is added to (R, G, B) in proportion to its weight.
//!
//! ```text
//! lum       = Y / 255
//! shadow    = 1 - min(1, 4 * lum)
//! highlight = max(0, 4 * (lum - 0.75))
//! midtone   = 1 - shadow - highlight
//! ```
//!
//! Weights are not clamped: a pixel pushed outside `[0, 255]` by an earlier
//! stage produces weights outside `[0, 1]`.

use serde::{Deserialize, Serialize};
use strata_core::pixel::{luma, Rgb};

/// One of the three tonal ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TonalRange {
    /// Dark tones.
    Shadows,
    /// Middle tones.
    Midtones,
    /// Bright tones.
    Highlights,
}

impl TonalRange {
    /// All ranges, dark to bright.
    pub const ALL: [TonalRange; 3] = [TonalRange::Shadows, TonalRange::Midtones, TonalRange::Highlights];
}

/// Additive channel shift for one tonal range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceShift {
    /// Added to red.
    pub cyan_red: f64,
    /// Added to green.
    pub magenta_green: f64,
    /// Added to blue.
    pub yellow_blue: f64,
}

impl BalanceShift {
    /// Creates a shift.
    pub const fn new(cyan_red: f64, magenta_green: f64, yellow_blue: f64) -> Self {
        Self { cyan_red, magenta_green, yellow_blue }
    }

    /// Returns `true` if all three components are zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.cyan_red == 0.0 && self.magenta_green == 0.0 && self.yellow_blue == 0.0
    }
}

/// Shadow/midtone/highlight weights for one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TonalWeights {
    /// Shadow weight.
    pub shadows: f64,
    /// Midtone weight.
    pub midtones: f64,
    /// Highlight weight.
    pub highlights: f64,
}

impl TonalWeights {
    /// Computes the weights of `rgb`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_color::TonalWeights;
    ///
    /// let w = TonalWeights::of([0.0, 0.0, 0.0]);
    /// assert_eq!((w.shadows, w.midtones, w.highlights), (1.0, 0.0, 0.0));
    /// ```
    pub fn of(rgb: Rgb) -> Self {
        let lum = luma(rgb) / 255.0;
        let shadows = 1.0 - (lum * 4.0).min(1.0);
        let highlights = ((lum - 0.75) * 4.0).max(0.0);
        Self {
            shadows,
            midtones: 1.0 - shadows - highlights,
            highlights,
        }
    }

    /// Weight for `range`.
    pub fn get(&self, range: TonalRange) -> f64 {
        match range {
            TonalRange::Shadows => self.shadows,
            TonalRange::Midtones => self.midtones,
            TonalRange::Highlights => self.highlights,
        }
    }
}

/// Per-range color balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorBalance {
    /// Shadows shift.
    pub shadows: BalanceShift,
    /// Midtones shift.
    pub midtones: BalanceShift,
    /// Highlights shift.
    pub highlights: BalanceShift,
}

impl ColorBalance {
    /// Shift for `range`.
    pub fn get(&self, range: TonalRange) -> &BalanceShift {
        match range {
            TonalRange::Shadows => &self.shadows,
            TonalRange::Midtones => &self.midtones,
            TonalRange::Highlights => &self.highlights,
        }
    }

    /// Mutable shift for `range`.
    pub fn get_mut(&mut self, range: TonalRange) -> &mut BalanceShift {
        match range {
            TonalRange::Shadows => &mut self.shadows,
            TonalRange::Midtones => &mut self.midtones,
            TonalRange::Highlights => &mut self.highlights,
        }
    }

    /// Returns a copy with `range` replaced.
    pub fn with(mut self, range: TonalRange, shift: BalanceShift) -> Self {
        *self.get_mut(range) = shift;
        self
    }

    /// Returns `true` if no range carries a shift.
    pub fn is_neutral(&self) -> bool {
        TonalRange::ALL.iter().all(|&r| self.get(r).is_zero())
    }

    /// Applies the balance to one pixel.
    pub fn apply(&self, rgb: Rgb) -> Rgb {
        let w = TonalWeights::of(rgb);
        let mut out = rgb;
        for range in TonalRange::ALL {
            let weight = w.get(range);
            let shift = self.get(range);
            out[0] += shift.cyan_red * weight;
            out[1] += shift.magenta_green * weight;
            out[2] += shift.yellow_blue * weight;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weights_sum_to_one() {
        for v in [0.0, 30.0, 63.75, 100.0, 191.25, 220.0, 255.0] {
            let w = TonalWeights::of([v, v, v]);
            assert_relative_eq!(w.shadows + w.midtones + w.highlights, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_weights_at_extremes() {
        let w = TonalWeights::of([255.0, 255.0, 255.0]);
        assert_relative_eq!(w.highlights, 1.0, epsilon = 1e-12);
        assert_relative_eq!(w.shadows, 0.0, epsilon = 1e-12);

        let mid = TonalWeights::of([128.0, 128.0, 128.0]);
        assert_relative_eq!(mid.midtones, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_weights_unclamped_outside_range() {
        let w = TonalWeights::of([300.0, 300.0, 300.0]);
        assert!(w.highlights > 1.0);
        assert!(w.midtones < 0.0);
    }

    #[test]
    fn test_shadow_shift_only_hits_dark_pixels() {
        let cb = ColorBalance::default().with(TonalRange::Shadows, BalanceShift::new(40.0, 0.0, -20.0));
        assert!(!cb.is_neutral());

        let dark = cb.apply([0.0, 0.0, 0.0]);
        assert_eq!(dark, [40.0, 0.0, -20.0]);

        let bright = cb.apply([255.0, 255.0, 255.0]);
        assert_relative_eq!(bright[0], 255.0, epsilon = 1e-9);
        assert_relative_eq!(bright[2], 255.0, epsilon = 1e-9);
    }

    #[test]
    fn test_default_is_neutral() {
        let cb = ColorBalance::default();
        assert!(cb.is_neutral());
        assert_eq!(cb.apply([12.0, 99.0, 240.0]), [12.0, 99.0, 240.0]);
    }
}
