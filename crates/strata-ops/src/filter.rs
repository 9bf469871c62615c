//! Spatial filters on RGBA8 buffers.
//!
//! # Sharpen
//!
//! ```text
//!  0 -1  0
//! -1  5 -1
//!  0 -1  0
//! ```
//!
//! Applied to the color channels of interior pixels, then mixed with the
//! source by `amount / 100`. The outermost rows and columns, and alpha
//! everywhere, pass through unchanged.
//!
//! # Box blur
//!
//! Unweighted mean over a `(2r+1)²` window, `r = ceil(radius)`, on all four
//! channels. Out-of-bounds samples are dropped from the mean instead of
//! clamped to the edge. Means round half to even, so `2.5` becomes `2`.

#[allow(unused_imports)]
use tracing::{debug, trace};

use strata_core::pixel::round_channel;
use strata_core::{RgbaImage, CHANNELS};

use crate::parallel::for_each_row;

/// 3x3 sharpen kernel, row-major.
pub const SHARPEN_KERNEL: [i32; 9] = [0, -1, 0, -1, 5, -1, 0, -1, 0];

/// Sharpens `src` by `amount` percent. Non-positive amounts copy the input.
///
/// Border pixels keep their source values. A convolution that writes only
/// interior pixels and leaves the border zeroed would instead fade the
/// outermost ring toward transparent black; this one does not.
///
/// # Example
///
/// ```rust
/// use strata_core::RgbaImage;
/// use strata_ops::filter::sharpen;
///
/// let flat = RgbaImage::filled(5, 5, [90, 90, 90, 255]);
/// assert_eq!(sharpen(&flat, 100.0, false), flat);
/// ```
pub fn sharpen(src: &RgbaImage, amount: f64, parallel: bool) -> RgbaImage {
    if amount.is_nan() || amount <= 0.0 {
        return src.clone();
    }
    let (w, h) = (src.width() as usize, src.height() as usize);
    trace!(width = w, height = h, amount, "filter::sharpen");

    let mut out = src.clone();
    if w < 3 || h < 3 {
        return out;
    }

    let factor = amount / 100.0;
    let data = src.as_raw();
    let stride = w * CHANNELS;

    for_each_row(out.as_raw_mut(), stride, parallel, |y, row| {
        if y == 0 || y == h - 1 {
            return;
        }
        for x in 1..w - 1 {
            for c in 0..3 {
                let mut sum = 0i32;
                for ky in 0..3 {
                    for kx in 0..3 {
                        let idx = ((y + ky - 1) * w + (x + kx - 1)) * CHANNELS + c;
                        sum += data[idx] as i32 * SHARPEN_KERNEL[ky * 3 + kx];
                    }
                }
                let conv = sum.clamp(0, 255) as f64;
                let s = data[(y * w + x) * CHANNELS + c] as f64;
                row[x * CHANNELS + c] = round_channel(s + (conv - s) * factor);
            }
        }
    });

    out
}

/// Box-blurs `src` with the given pixel radius. Non-positive radii copy
/// the input.
///
/// Horizontal window sums come from per-row prefix sums; the vertical pass
/// adds those up per column. Sums are exact integers, so the mean matches a
/// direct 2D window.
pub fn box_blur(src: &RgbaImage, radius: f64, parallel: bool) -> RgbaImage {
    if radius.is_nan() || radius <= 0.0 {
        return src.clone();
    }
    let (w, h) = (src.width() as usize, src.height() as usize);
    let mut out = src.clone();
    if w == 0 || h == 0 {
        return out;
    }
    let r = radius.ceil().min((w.max(h)) as f64) as usize;
    trace!(width = w, height = h, radius = r, "filter::box_blur");

    let data = src.as_raw();
    let stride = w * CHANNELS;

    // Horizontal window sums, one u64 per sample.
    let mut hsum = vec![0u64; w * h * CHANNELS];
    let mut prefix = vec![0u64; (w + 1) * CHANNELS];
    for y in 0..h {
        let src_row = &data[y * stride..(y + 1) * stride];
        for x in 0..w {
            for c in 0..CHANNELS {
                prefix[(x + 1) * CHANNELS + c] = prefix[x * CHANNELS + c] + src_row[x * CHANNELS + c] as u64;
            }
        }
        for x in 0..w {
            let lo = x.saturating_sub(r);
            let hi = (x + r + 1).min(w);
            for c in 0..CHANNELS {
                hsum[(y * w + x) * CHANNELS + c] = prefix[hi * CHANNELS + c] - prefix[lo * CHANNELS + c];
            }
        }
    }

    for_each_row(out.as_raw_mut(), stride, parallel, |y, row| {
        let lo = y.saturating_sub(r);
        let hi = (y + r + 1).min(h);
        let rows = (hi - lo) as u64;
        for x in 0..w {
            let cols = ((x + r + 1).min(w) - x.saturating_sub(r)) as u64;
            let count = (rows * cols) as f64;
            for c in 0..CHANNELS {
                let mut sum = 0u64;
                for yy in lo..hi {
                    sum += hsum[(yy * w + x) * CHANNELS + c];
                }
                row[x * CHANNELS + c] = mean_to_u8(sum as f64 / count);
            }
        }
    });

    out
}

/// Rounds a window mean to a channel byte, ties to even.
#[inline]
fn mean_to_u8(v: f64) -> u8 {
    v.round_ties_even().clamp(0.0, 255.0) as u8
}
