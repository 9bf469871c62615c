//! Global tonal and color adjustments.
//!
//! Each function maps one RGB triple to another. Amounts use the editor's
//! slider scales (mostly -100..=100); the formulas below are the contract.
//!
//! | Function | Formula |
//! |----------|---------|
//! | [`brightness`] | `c + amount * 2.55` |
//! | [`contrast`] | `f * (c - 128) + 128`, `f = 259(a+255) / (255(259-a))` |
//! | [`exposure`] | `c * 2^(amount/100)` |
//! | [`saturation`] | `Y + (1 + amount/100)(c - Y)` |
//! | [`vibrance`] | saturation weighted by distance from gray |
//!
//! `Y` is Rec.709 luma of the input pixel.

use strata_core::pixel::{luma, Rgb};

/// Largest contrast magnitude accepted by [`contrast`].
///
/// The contrast factor has its pole at `amount = 259`; the editor range is
/// the open interval `(-255, 255)`, so inputs are clamped to `±254`.
pub const MAX_CONTRAST: f64 = 254.0;

/// Additive shift of `amount * 2.55` on every channel.
///
/// Maps a -100..=100 slider onto a full 8-bit shift.
#[inline]
pub fn brightness(rgb: Rgb, amount: f64) -> Rgb {
    let shift = amount * 2.55;
    [rgb[0] + shift, rgb[1] + shift, rgb[2] + shift]
}

/// Contrast factor for `amount`, after clamping to [`MAX_CONTRAST`].
#[inline]
pub fn contrast_factor(amount: f64) -> f64 {
    let a = amount.clamp(-MAX_CONTRAST, MAX_CONTRAST);
    (259.0 * (a + 255.0)) / (255.0 * (259.0 - a))
}

/// Scales every channel around the 128 midpoint.
///
/// # Example
///
/// ```rust
/// use strata_color::adjust::contrast;
///
/// let out = contrast([128.0, 64.0, 192.0], 50.0);
/// assert_eq!(out[0], 128.0);
/// assert!(out[1] < 64.0 && out[2] > 192.0);
/// ```
#[inline]
pub fn contrast(rgb: Rgb, amount: f64) -> Rgb {
    let f = contrast_factor(amount);
    [
        f * (rgb[0] - 128.0) + 128.0,
        f * (rgb[1] - 128.0) + 128.0,
        f * (rgb[2] - 128.0) + 128.0,
    ]
}

/// Multiplies every channel by `2^(amount/100)` (100 units = one stop).
#[inline]
pub fn exposure(rgb: Rgb, amount: f64) -> Rgb {
    let f = 2f64.powf(amount / 100.0);
    [rgb[0] * f, rgb[1] * f, rgb[2] * f]
}

#[inline]
fn scale_around_luma(rgb: Rgb, factor: f64) -> Rgb {
    let gray = luma(rgb);
    [
        gray + factor * (rgb[0] - gray),
        gray + factor * (rgb[1] - gray),
        gray + factor * (rgb[2] - gray),
    ]
}

/// Pushes channels toward (`amount < 0`) or away from (`amount > 0`) luma.
///
/// `-100` yields a grayscale pixel.
#[inline]
pub fn saturation(rgb: Rgb, amount: f64) -> Rgb {
    scale_around_luma(rgb, 1.0 + amount / 100.0)
}

/// Saturation that favors muted colors.
///
/// The strength grows with the distance between the brightest channel and
/// the channel mean, and flips sign when red is the brightest channel so
/// skin tones are pulled back rather than boosted.
pub fn vibrance(rgb: Rgb, amount: f64) -> Rgb {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let avg = (r + g + b) / 3.0;
    let amt = ((max - avg).abs() * 2.0 / 255.0) * amount / 100.0;
    let red_is_max = r >= g && r >= b;
    let factor = 1.0 + if red_is_max { -amt } else { amt };
    scale_around_luma(rgb, factor)
}

/// Euclidean distance between two colors in RGB space.
///
/// Symmetric, and zero only for identical colors.
#[inline]
pub fn color_distance(a: Rgb, b: Rgb) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_brightness_shift() {
        assert_eq!(brightness([10.0, 20.0, 30.0], 100.0), [265.0, 275.0, 285.0]);
        assert_eq!(brightness([10.0, 20.0, 30.0], 0.0), [10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_contrast_zero_is_identity() {
        assert_relative_eq!(contrast_factor(0.0), 1.0, epsilon = 1e-12);
        let px = [12.0, 128.0, 250.0];
        let out = contrast(px, 0.0);
        for c in 0..3 {
            assert_relative_eq!(out[c], px[c], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_contrast_singularity_is_guarded() {
        for a in [255.0, 259.0, 1e9, -1e9, -255.0] {
            let out = contrast([10.0, 128.0, 200.0], a);
            assert!(out.iter().all(|v| v.is_finite()), "amount {a} produced {out:?}");
        }
    }

    #[test]
    fn test_exposure_one_stop() {
        let out = exposure([50.0, 60.0, 70.0], 100.0);
        assert_relative_eq!(out[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(out[2], 140.0, epsilon = 1e-9);
    }

    #[test]
    fn test_saturation_full_desaturate() {
        let out = saturation([200.0, 100.0, 50.0], -100.0);
        assert_relative_eq!(out[0], out[1], epsilon = 1e-9);
        assert_relative_eq!(out[1], out[2], epsilon = 1e-9);
    }

    #[test]
    fn test_vibrance_gray_unchanged() {
        let out = vibrance([90.0, 90.0, 90.0], 80.0);
        assert_eq!(out, [90.0, 90.0, 90.0]);
    }

    #[test]
    fn test_vibrance_sign_depends_on_red() {
        // Blue-dominant pixel gets more saturated.
        let blue = [60.0, 80.0, 200.0];
        let out = vibrance(blue, 50.0);
        assert!(out[2] > blue[2]);

        // Red-dominant pixel is pulled toward gray.
        let red = [200.0, 80.0, 60.0];
        let out = vibrance(red, 50.0);
        assert!(out[0] < red[0]);
    }

    #[test]
    fn test_color_distance() {
        let a = [10.0, 20.0, 30.0];
        let b = [13.0, 24.0, 30.0];
        assert_relative_eq!(color_distance(a, b), 5.0, epsilon = 1e-12);
        assert_eq!(color_distance(a, b), color_distance(b, a));
        assert_eq!(color_distance(a, a), 0.0);
        assert_relative_eq!(
            color_distance([0.0; 3], [255.0; 3]),
            441.672_955_930_063_7,
            epsilon = 1e-9
        );
    }
}
