//! Per-layer edit parameters.
//!
//! An [`AdjustmentSet`] is plain data: it is stored on a layer, serialized
//! with projects, and compiled by the [`pipeline`](crate::pipeline) when the
//! layer is rendered. Every field defaults to its neutral value, so
//! `AdjustmentSet::default()` renders an image unchanged.

use serde::{Deserialize, Serialize};
use strata_color::{ColorBalance, HexColor, HslAdjustments, Preset};
use strata_lut::CurveSet;

#[inline]
fn is_positive(v: f64) -> bool {
    v > 0.0
}

/// Selective color replacement.
///
/// Pixels within `tolerance * 4.41` (RGB Euclidean distance) of
/// `source_color` are pulled toward `target_color`, fully at distance 0 and
/// not at all at the radius. A tolerance of 0 disables the stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorReplace {
    /// Color to match.
    pub source_color: HexColor,
    /// Color to move matched pixels toward.
    pub target_color: HexColor,
    /// Match radius in percent of the RGB cube diagonal.
    pub tolerance: f64,
}

impl ColorReplace {
    /// Scale from tolerance to RGB distance (about `441.67 / 100`).
    pub const DISTANCE_PER_TOLERANCE: f64 = 4.41;

    /// Match radius in RGB distance units.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.tolerance * Self::DISTANCE_PER_TOLERANCE
    }

    /// Returns `true` if the stage changes nothing.
    #[inline]
    pub fn is_neutral(&self) -> bool {
        self.tolerance.is_nan() || self.tolerance <= 0.0
    }
}

impl Default for ColorReplace {
    fn default() -> Self {
        Self {
            source_color: HexColor::new(0xff, 0x00, 0x00),
            target_color: HexColor::new(0x00, 0x00, 0xff),
            tolerance: 0.0,
        }
    }
}

/// The full set of edit parameters for one image layer.
///
/// Scalar amounts use slider units, neutral at 0:
///
/// | Field | Range | Effect |
/// |-------|-------|--------|
/// | `brightness` | -100..100 | additive shift |
/// | `contrast` | -100..100 | scale around 128, clamped to ±254 |
/// | `saturation` | -100..100 | scale around luma |
/// | `exposure` | -100..100 | stops × 100 |
/// | `vibrance` | -100..100 | muted-color saturation |
/// | `sharpen` | 0..100 | 3x3 sharpen mix |
/// | `blur` | 0..20 | box blur, radius `blur * 3` pixels |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentSet {
    /// Additive brightness.
    pub brightness: f64,
    /// Contrast around mid-gray.
    pub contrast: f64,
    /// Saturation.
    pub saturation: f64,
    /// Exposure in hundredths of a stop.
    pub exposure: f64,
    /// Blur amount; pixel radius is three times this.
    pub blur: f64,
    /// Sharpen mix in percent.
    pub sharpen: f64,
    /// Vibrance.
    pub vibrance: f64,
    /// Preset look.
    pub filter: Preset,
    /// Preset blend weight, 0-100.
    pub filter_intensity: f64,
    /// Selective hue-band adjustments.
    pub hsl: HslAdjustments,
    /// Shadows/midtones/highlights color balance.
    pub color_balance: ColorBalance,
    /// Tone curves.
    pub curves: CurveSet,
    /// Color replacement.
    pub color_replace: ColorReplace,
}

impl Default for AdjustmentSet {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            exposure: 0.0,
            blur: 0.0,
            sharpen: 0.0,
            vibrance: 0.0,
            filter: Preset::None,
            filter_intensity: 100.0,
            hsl: HslAdjustments::default(),
            color_balance: ColorBalance::default(),
            curves: CurveSet::default(),
            color_replace: ColorReplace::default(),
        }
    }
}

impl AdjustmentSet {
    /// Returns `true` if the per-pixel pass has nothing to do.
    pub fn is_pixel_identity(&self) -> bool {
        self.exposure == 0.0
            && self.brightness == 0.0
            && self.contrast == 0.0
            && self.saturation == 0.0
            && self.vibrance == 0.0
            && self.hsl.is_neutral()
            && self.color_balance.is_neutral()
            && self.curves.is_default()
            && self.filter.is_none()
            && self.color_replace.is_neutral()
    }

    /// Returns `true` if neither sharpen nor blur will run.
    pub fn is_spatial_identity(&self) -> bool {
        !is_positive(self.sharpen) && !is_positive(self.blur)
    }

    /// Returns `true` if rendering with this set returns the input unchanged.
    pub fn is_identity(&self) -> bool {
        self.is_pixel_identity() && self.is_spatial_identity()
    }

    /// Blur radius in pixels.
    #[inline]
    pub fn blur_radius(&self) -> f64 {
        self.blur * 3.0
    }
}
