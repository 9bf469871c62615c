//! Layer placement.
//!
//! A [`Transform`] places an image layer on the canvas: its natural size is
//! scaled to `width * scale_x` by `height * scale_y`, put at `(x, y)`, and
//! rotated about the center of that box. [`Transform::to_affine`] turns it
//! into the [`Affine`] map from source pixel space to canvas space that
//! [`Canvas::draw_image`](crate::Canvas::draw_image) consumes.

use serde::{Deserialize, Serialize};

/// 2D affine map `(x, y) -> (a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    /// x scale / rotation
    pub a: f64,
    /// y shear / rotation
    pub b: f64,
    /// x shear / rotation
    pub c: f64,
    /// y scale / rotation
    pub d: f64,
    /// x translation
    pub e: f64,
    /// y translation
    pub f: f64,
}

impl Affine {
    /// Identity map.
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    /// Translation by `(tx, ty)`.
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self { e: tx, f: ty, ..Self::IDENTITY }
    }

    /// Axis scale.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self { a: sx, d: sy, ..Self::IDENTITY }
    }

    /// Rotation by `degrees`, clockwise on a y-down canvas.
    pub fn rotate(degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self { a: c, b: s, c: -s, d: c, e: 0.0, f: 0.0 }
    }

    /// `self` after `inner`: maps `p` to `self(inner(p))`.
    pub fn then(&self, inner: &Affine) -> Affine {
        Affine {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    /// Maps a point.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// Inverse map, or `None` if the map collapses area to zero.
    pub fn invert(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Affine {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Position, size, rotation and scale of an image layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// Left edge of the unrotated box.
    pub x: f64,
    /// Top edge of the unrotated box.
    pub y: f64,
    /// Base width before `scale_x`.
    pub width: f64,
    /// Base height before `scale_y`.
    pub height: f64,
    /// Rotation in degrees about the box center.
    pub rotation: f64,
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Transform {
    /// Identity placement for an image of `width` x `height`.
    pub fn for_size(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            ..Self::default()
        }
    }

    /// Drawn size, `(width * scale_x, height * scale_y)`.
    pub fn draw_size(&self) -> (f64, f64) {
        (self.width * self.scale_x, self.height * self.scale_y)
    }

    /// Center of the drawn box.
    pub fn center(&self) -> (f64, f64) {
        let (w, h) = self.draw_size();
        (self.x + w / 2.0, self.y + h / 2.0)
    }

    /// Returns `true` if a `src_w` x `src_h` image lands pixel-for-pixel at
    /// the origin.
    pub fn is_identity_for(&self, src_w: u32, src_h: u32) -> bool {
        let (w, h) = self.draw_size();
        self.x == 0.0 && self.y == 0.0 && self.rotation == 0.0 && w == src_w as f64 && h == src_h as f64
    }

    /// Map from source pixel coordinates of a `src_w` x `src_h` image to
    /// canvas coordinates.
    ///
    /// Without rotation this is scale then translate to `(x, y)`. With
    /// rotation the scaled box is centered on the origin, rotated, and moved
    /// to [`center`](Self::center).
    pub fn to_affine(&self, src_w: u32, src_h: u32) -> Affine {
        let (w, h) = self.draw_size();
        let sx = if src_w == 0 { 0.0 } else { w / src_w as f64 };
        let sy = if src_h == 0 { 0.0 } else { h / src_h as f64 };
        let scale = Affine::scale(sx, sy);

        if self.rotation == 0.0 {
            return Affine::translate(self.x, self.y).then(&scale);
        }

        let (cx, cy) = self.center();
        Affine::translate(cx, cy)
            .then(&Affine::rotate(self.rotation))
            .then(&Affine::translate(-w / 2.0, -h / 2.0))
            .then(&scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_for_size_identity() {
        let t = Transform::for_size(40, 30);
        assert!(t.is_identity_for(40, 30));
        assert!(!t.is_identity_for(41, 30));
        assert_eq!(t.to_affine(40, 30), Affine::IDENTITY);
    }

    #[test]
    fn test_scaled_placement() {
        let t = Transform { x: 5.0, y: 7.0, scale_x: 2.0, scale_y: 0.5, ..Transform::for_size(10, 10) };
        let m = t.to_affine(10, 10);
        assert_eq!(m.apply(0.0, 0.0), (5.0, 7.0));
        assert_eq!(m.apply(10.0, 10.0), (25.0, 12.0));
    }

    #[test]
    fn test_size_differs_from_source() {
        // A 20x10 box filled from a 10x10 source.
        let t = Transform { width: 20.0, height: 10.0, ..Transform::default() };
        let m = t.to_affine(10, 10);
        assert_eq!(m.apply(10.0, 10.0), (20.0, 10.0));
    }

    #[test]
    fn test_rotation_about_center() {
        let t = Transform { x: 10.0, y: 20.0, rotation: 90.0, ..Transform::for_size(4, 2) };
        let m = t.to_affine(4, 2);
        let (cx, cy) = m.apply(2.0, 1.0);
        assert_relative_eq!(cx, 12.0, epsilon = 1e-9);
        assert_relative_eq!(cy, 21.0, epsilon = 1e-9);
        // Top-left corner swings to the top-right on a y-down canvas.
        let (x, y) = m.apply(0.0, 0.0);
        assert_relative_eq!(x, 13.0, epsilon = 1e-9);
        assert_relative_eq!(y, 19.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invert_roundtrip() {
        let t = Transform { x: 3.0, y: -4.0, rotation: 33.0, scale_x: 1.5, scale_y: 0.75, ..Transform::for_size(8, 6) };
        let m = t.to_affine(8, 6);
        let inv = m.invert().unwrap();
        let (x, y) = m.apply(2.5, 4.0);
        let (u, v) = inv.apply(x, y);
        assert_relative_eq!(u, 2.5, epsilon = 1e-9);
        assert_relative_eq!(v, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_has_no_inverse() {
        let t = Transform { scale_x: 0.0, ..Transform::for_size(8, 6) };
        assert!(t.to_affine(8, 6).invert().is_none());
    }
}
