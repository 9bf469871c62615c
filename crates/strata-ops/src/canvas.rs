//! Off-screen drawing surface.
//!
//! A [`Canvas`] owns an RGBA8 buffer and draws other buffers onto it. Each
//! draw call takes a placement ([`Affine`]), a global alpha, and a
//! [`BlendMode`], and composites with the rules in [`crate::composite`].
//!
//! Placement is resolved by inverse mapping: every destination pixel whose
//! center falls inside the placed source rectangle samples the source
//! bilinearly (premultiplied, clamped to the edge) at the mapped point.
//! Pixel-aligned unscaled placements reproduce the source bytes exactly.

use strata_core::RgbaImage;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::composite::{blend_pixel, composite, from_unit, to_unit, BlendMode, UnitRgba};
use crate::transform::Affine;

/// RGBA8 drawing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Surface initialized with `image`.
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Surface width.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Surface height.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Current contents.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Mutable access to the raw contents.
    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    /// Consumes the surface.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Resets every pixel to transparent black.
    pub fn clear(&mut self) {
        self.image.as_raw_mut().fill(0);
    }

    /// Draws `src` with its top-left corner at `(x, y)`, unscaled.
    pub fn draw_image_at(&mut self, src: &RgbaImage, x: f64, y: f64, opacity: f64, mode: BlendMode) {
        self.draw_image(src, &Affine::translate(x, y), opacity, mode);
    }

    /// Draws `src` mapped into canvas space by `map`.
    ///
    /// `map` takes source pixel coordinates (`0..width`, `0..height`) to
    /// canvas coordinates. Degenerate maps and zero opacity draw nothing.
    pub fn draw_image(&mut self, src: &RgbaImage, map: &Affine, opacity: f64, mode: BlendMode) {
        let opacity = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
        if src.is_empty() || self.image.is_empty() || opacity == 0.0 {
            return;
        }
        let (sw, sh) = src.dimensions();
        trace!(src_w = sw, src_h = sh, opacity, %mode, "canvas::draw_image");

        if *map == Affine::IDENTITY && src.dimensions() == self.image.dimensions() {
            match composite(&mut self.image, src, opacity, mode) {
                Ok(()) => return,
                Err(e) => debug_assert!(false, "identity draw on equal sizes failed: {e}"),
            }
        }

        let Some(inv) = map.invert() else {
            debug!("canvas::draw_image skipped degenerate placement");
            return;
        };

        let (sw_f, sh_f) = (sw as f64, sh as f64);
        let corners = [
            map.apply(0.0, 0.0),
            map.apply(sw_f, 0.0),
            map.apply(0.0, sh_f),
            map.apply(sw_f, sh_f),
        ];
        let min_x = corners.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

        let (dw, dh) = self.image.dimensions();
        let x0 = min_x.floor().max(0.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let x1 = max_x.ceil().min(dw as f64).max(0.0) as u32;
        let y1 = max_y.ceil().min(dh as f64).max(0.0) as u32;

        for py in y0..y1 {
            for px in x0..x1 {
                let (u, v) = inv.apply(px as f64 + 0.5, py as f64 + 0.5);
                if u < 0.0 || v < 0.0 || u >= sw_f || v >= sh_f {
                    continue;
                }
                let mut sp = sample_bilinear(src, u - 0.5, v - 0.5);
                sp[3] *= opacity;
                if sp[3] <= 0.0 {
                    continue;
                }
                let dst = to_unit(self.image.pixel(px, py));
                self.image.set_pixel(px, py, from_unit(blend_pixel(sp, dst, mode)));
            }
        }
    }
}

/// Bilinear sample at continuous pixel coordinates, edge-clamped.
///
/// Interpolates premultiplied values and returns straight alpha.
fn sample_bilinear(src: &RgbaImage, x: f64, y: f64) -> UnitRgba {
    let (w, h) = src.dimensions();
    let max_x = (w - 1) as f64;
    let max_y = (h - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as u32, y0 as u32);

    if fx == 0.0 && fy == 0.0 {
        return to_unit(src.pixel(x0, y0));
    }

    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let taps = [
        (src.pixel(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (src.pixel(x1, y0), fx * (1.0 - fy)),
        (src.pixel(x0, y1), (1.0 - fx) * fy),
        (src.pixel(x1, y1), fx * fy),
    ];

    let mut acc = [0.0f64; 4];
    for (p, wgt) in taps {
        let u = to_unit(p);
        acc[0] += u[0] * u[3] * wgt;
        acc[1] += u[1] * u[3] * wgt;
        acc[2] += u[2] * u[3] * wgt;
        acc[3] += u[3] * wgt;
    }
    if acc[3] <= 0.0 {
        return [0.0; 4];
    }
    [acc[0] / acc[3], acc[1] / acc[3], acc[2] / acc[3], acc[3]]
}
