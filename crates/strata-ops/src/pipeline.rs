//! The adjustment pipeline.
//!
//! Rendering an image layer runs two passes:
//!
//! 1. [`apply_adjustments`] - per-pixel color pass, fixed stage order:
//!
//!    ```text
//!    exposure -> brightness -> contrast -> saturation -> vibrance
//!      -> selective HSL -> color balance -> curves -> preset -> color replace
//!    ```
//!
//! 2. spatial filters - [`sharpen`](crate::filter::sharpen), then
//!    [`box_blur`](crate::filter::box_blur) at radius `blur * 3`.
//!
//! [`process`] runs both. Stage parameters are checked once per image and
//! neutral stages are skipped; skipping never changes the output. Values
//! stay in `f64` between stages and are clamped and rounded only where a
//! stage needs integer input (HSL conversion, curve lookup, preset) and at
//! final output. Alpha is copied through by the color pass.

#[allow(unused_imports)]
use tracing::{debug, trace};

use strata_color::adjust::{brightness, color_distance, contrast, exposure, saturation, vibrance};
use strata_color::{ColorBalance, HslAdjustments, Preset};
use strata_core::pixel::{clamp_rgb, round_channel, Rgb};
use strata_core::{RgbaImage, CHANNELS};
use strata_lut::ToneLut;

use crate::adjustments::AdjustmentSet;
use crate::filter::{box_blur, sharpen};
use crate::parallel::for_each_row;

/// Execution options for the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Process rows on the rayon pool. Ignored without the `parallel`
    /// feature.
    pub parallel: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl PipelineOptions {
    /// Single-threaded execution.
    pub fn sequential() -> Self {
        Self { parallel: false }
    }
}

/// An [`AdjustmentSet`] resolved into per-pixel work.
///
/// Curves are compiled to lookup tables and neutral stages are dropped, so
/// one `CompiledAdjustments` can be applied to many pixels cheaply.
#[derive(Debug, Clone)]
pub struct CompiledAdjustments {
    exposure: Option<f64>,
    brightness: Option<f64>,
    contrast: Option<f64>,
    saturation: Option<f64>,
    vibrance: Option<f64>,
    hsl: Option<HslAdjustments>,
    color_balance: Option<ColorBalance>,
    // Composite curve folded into each channel.
    curves: Option<[ToneLut; 3]>,
    preset: Option<(Preset, f64)>,
    replace: Option<Replace>,
}

#[derive(Debug, Clone, Copy)]
struct Replace {
    source: Rgb,
    target: Rgb,
    radius: f64,
}

#[inline]
fn nonzero(v: f64) -> Option<f64> {
    (v != 0.0).then_some(v)
}

impl CompiledAdjustments {
    /// Resolves `adj`.
    pub fn new(adj: &AdjustmentSet) -> Self {
        let curves = (!adj.curves.is_default()).then(|| {
            let rgb = ToneLut::from_points(&adj.curves.rgb);
            [
                rgb.compose(&ToneLut::from_points(&adj.curves.r)),
                rgb.compose(&ToneLut::from_points(&adj.curves.g)),
                rgb.compose(&ToneLut::from_points(&adj.curves.b)),
            ]
        });
        let replace = (!adj.color_replace.is_neutral()).then(|| Replace {
            source: adj.color_replace.source_color.to_rgb(),
            target: adj.color_replace.target_color.to_rgb(),
            radius: adj.color_replace.radius(),
        });

        let compiled = Self {
            exposure: nonzero(adj.exposure),
            brightness: nonzero(adj.brightness),
            contrast: nonzero(adj.contrast),
            saturation: nonzero(adj.saturation),
            vibrance: nonzero(adj.vibrance),
            hsl: (!adj.hsl.is_neutral()).then_some(adj.hsl),
            color_balance: (!adj.color_balance.is_neutral()).then_some(adj.color_balance),
            curves,
            preset: (!adj.filter.is_none()).then_some((adj.filter, adj.filter_intensity)),
            replace,
        };
        debug!(
            hsl = compiled.hsl.is_some(),
            color_balance = compiled.color_balance.is_some(),
            curves = compiled.curves.is_some(),
            preset = ?adj.filter,
            replace = compiled.replace.is_some(),
            "compiled adjustments"
        );
        compiled
    }

    /// Returns `true` if every stage was dropped.
    pub fn is_identity(&self) -> bool {
        self.exposure.is_none()
            && self.brightness.is_none()
            && self.contrast.is_none()
            && self.saturation.is_none()
            && self.vibrance.is_none()
            && self.hsl.is_none()
            && self.color_balance.is_none()
            && self.curves.is_none()
            && self.preset.is_none()
            && self.replace.is_none()
    }

    /// Runs the color stages on one pixel and quantizes the result.
    pub fn apply_pixel(&self, px: [u8; 3]) -> [u8; 3] {
        let mut rgb: Rgb = [px[0] as f64, px[1] as f64, px[2] as f64];

        if let Some(a) = self.exposure {
            rgb = exposure(rgb, a);
        }
        if let Some(a) = self.brightness {
            rgb = brightness(rgb, a);
        }
        if let Some(a) = self.contrast {
            rgb = contrast(rgb, a);
        }
        if let Some(a) = self.saturation {
            rgb = saturation(rgb, a);
        }
        if let Some(a) = self.vibrance {
            rgb = vibrance(rgb, a);
        }
        if let Some(hsl) = &self.hsl {
            rgb = hsl.apply(rgb);
        }
        if let Some(cb) = &self.color_balance {
            rgb = cb.apply(rgb);
        }
        if let Some(luts) = &self.curves {
            for c in 0..3 {
                rgb[c] = luts[c].apply(round_channel(rgb[c])) as f64;
            }
        }
        if let Some((preset, intensity)) = self.preset {
            let f = preset.transform(clamp_rgb(rgb));
            let t = intensity / 100.0;
            for c in 0..3 {
                rgb[c] += (f[c] - rgb[c]) * t;
            }
        }
        if let Some(rep) = &self.replace {
            let dist = color_distance(rgb, rep.source);
            if dist < rep.radius {
                let w = 1.0 - dist / rep.radius;
                for c in 0..3 {
                    rgb[c] += (rep.target[c] - rgb[c]) * w;
                }
            }
        }

        [round_channel(rgb[0]), round_channel(rgb[1]), round_channel(rgb[2])]
    }
}

/// Per-pixel color pass with default options.
///
/// # Example
///
/// ```rust
/// use strata_core::RgbaImage;
/// use strata_lut::CurvePoint;
/// use strata_ops::{pipeline::apply_adjustments, AdjustmentSet};
///
/// let white = RgbaImage::filled(2, 2, [255, 255, 255, 255]);
/// let mut adj = AdjustmentSet::default();
/// adj.curves.rgb = vec![CurvePoint::new(0.0, 50.0), CurvePoint::new(255.0, 200.0)];
///
/// let out = apply_adjustments(&white, &adj);
/// assert!(out.pixels().all(|p| p == [200, 200, 200, 255]));
/// ```
pub fn apply_adjustments(image: &RgbaImage, adj: &AdjustmentSet) -> RgbaImage {
    apply_adjustments_with(image, adj, &PipelineOptions::default())
}

/// Per-pixel color pass.
pub fn apply_adjustments_with(image: &RgbaImage, adj: &AdjustmentSet, opts: &PipelineOptions) -> RgbaImage {
    let (w, h) = image.dimensions();
    trace!(width = w, height = h, parallel = opts.parallel, "pipeline::apply_adjustments");

    let compiled = CompiledAdjustments::new(adj);
    if compiled.is_identity() {
        return image.clone();
    }

    let src = image.as_raw();
    let stride = w as usize * CHANNELS;
    let mut out = RgbaImage::new(w, h);
    for_each_row(out.as_raw_mut(), stride, opts.parallel, |y, row| {
        let src_row = &src[y * stride..(y + 1) * stride];
        for (d, s) in row.chunks_exact_mut(CHANNELS).zip(src_row.chunks_exact(CHANNELS)) {
            let [r, g, b] = compiled.apply_pixel([s[0], s[1], s[2]]);
            d[0] = r;
            d[1] = g;
            d[2] = b;
            d[3] = s[3];
        }
    });
    out
}

/// Full layer render: color pass, then sharpen, then blur.
pub fn process(image: &RgbaImage, adj: &AdjustmentSet) -> RgbaImage {
    process_with(image, adj, &PipelineOptions::default())
}

/// Full layer render with explicit options.
pub fn process_with(image: &RgbaImage, adj: &AdjustmentSet, opts: &PipelineOptions) -> RgbaImage {
    if adj.is_identity() {
        trace!("pipeline::process identity");
        return image.clone();
    }
    let mut out = apply_adjustments_with(image, adj, opts);
    if adj.sharpen > 0.0 {
        out = sharpen(&out, adj.sharpen, opts.parallel);
    }
    if adj.blur > 0.0 {
        out = box_blur(&out, adj.blur_radius(), opts.parallel);
    }
    out
}
