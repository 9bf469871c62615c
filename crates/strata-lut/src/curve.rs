//! Curve control points and the curve compiler.

use serde::{Deserialize, Serialize};
use strata_core::pixel::round_channel;
use tracing::trace;

use crate::lut::LUT_SIZE;

/// One curve control point, both coordinates in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Input level.
    pub x: f64,
    /// Output level.
    pub y: f64,
}

impl CurvePoint {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The two-point identity curve `[(0, 0), (255, 255)]`.
pub fn identity_points() -> Vec<CurvePoint> {
    vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(255.0, 255.0)]
}

fn is_identity_pair(points: &[CurvePoint]) -> bool {
    match points {
        [a, b] => {
            let (lo, hi) = if a.x <= b.x { (a, b) } else { (b, a) };
            lo.x == 0.0 && lo.y == 0.0 && hi.x == 255.0 && hi.y == 255.0
        }
        _ => false,
    }
}

/// Compiles control points into a 256-entry table.
///
/// Points are sorted by `x` internally. Two points sharing an `x` value is a
/// caller error; the result is then unspecified but still a valid table.
///
/// Entries are rounded and clamped to `[0, 255]`. For each `i`, inputs at or
/// below the first `x` map to the first `y`, inputs at or above the last `x`
/// map to the last `y`.
pub fn build_curve_lut(points: &[CurvePoint]) -> [u8; LUT_SIZE] {
    let mut lut = [0u8; LUT_SIZE];
    if points.len() < 2 {
        for (i, v) in lut.iter_mut().enumerate() {
            *v = i as u8;
        }
        return lut;
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));
    let xs: Vec<f64> = sorted.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = sorted.iter().map(|p| p.y).collect();
    let n = xs.len();
    trace!(points = n, "build_curve_lut");

    let first = (xs[0], ys[0]);
    let last = (xs[n - 1], ys[n - 1]);

    if n == 2 {
        for (i, v) in lut.iter_mut().enumerate() {
            let x = i as f64;
            let y = if x <= first.0 {
                first.1
            } else if x >= last.0 {
                last.1
            } else {
                let t = (x - xs[0]) / (xs[1] - xs[0]);
                ys[0] + t * (ys[1] - ys[0])
            };
            *v = round_channel(y);
        }
        return lut;
    }

    let spline = MonotoneCubic::new(&xs, &ys);
    for (i, v) in lut.iter_mut().enumerate() {
        let x = i as f64;
        let y = if x <= first.0 {
            first.1
        } else if x >= last.0 {
            last.1
        } else {
            spline.eval(x)
        };
        *v = round_channel(y);
    }
    lut
}

/// Piecewise cubic with Fritsch-Carlson tangents.
struct MonotoneCubic<'a> {
    xs: &'a [f64],
    ys: &'a [f64],
    c1: Vec<f64>,
    c2: Vec<f64>,
    c3: Vec<f64>,
}

impl<'a> MonotoneCubic<'a> {
    fn new(xs: &'a [f64], ys: &'a [f64]) -> Self {
        let segs = xs.len() - 1;
        let dxs: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let ms: Vec<f64> = (0..segs).map(|i| (ys[i + 1] - ys[i]) / dxs[i]).collect();

        // Tangents: end secants at the ends, weighted harmonic mean inside,
        // flat at local extrema.
        let mut c1 = Vec::with_capacity(segs + 1);
        c1.push(ms[0]);
        for i in 0..segs - 1 {
            let (m0, m1) = (ms[i], ms[i + 1]);
            if m0 * m1 <= 0.0 {
                c1.push(0.0);
            } else {
                let (dx_r, dx_l) = (dxs[i], dxs[i + 1]);
                let common = dx_r + dx_l;
                c1.push(3.0 * common / ((common + dx_l) / m0 + (common + dx_r) / m1));
            }
        }
        c1.push(ms[segs - 1]);

        let mut c2 = Vec::with_capacity(segs);
        let mut c3 = Vec::with_capacity(segs);
        for i in 0..segs {
            let inv_dx = 1.0 / dxs[i];
            let common = c1[i] + c1[i + 1] - ms[i] - ms[i];
            c2.push((ms[i] - c1[i] - common) * inv_dx);
            c3.push(common * inv_dx * inv_dx);
        }

        Self { xs, ys, c1, c2, c3 }
    }

    /// Evaluates strictly inside `(xs[0], xs[n-1])`.
    fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let seg = (0..n - 1).find(|&j| x < self.xs[j + 1]).unwrap_or(n - 2);
        let d = x - self.xs[seg];
        self.ys[seg] + self.c1[seg] * d + self.c2[seg] * d * d + self.c3[seg] * d * d * d
    }
}

/// Composite and per-channel curves.
///
/// The composite curve is applied to all three channels first, then each
/// channel's own curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveSet {
    /// Composite curve.
    pub rgb: Vec<CurvePoint>,
    /// Red channel curve.
    pub r: Vec<CurvePoint>,
    /// Green channel curve.
    pub g: Vec<CurvePoint>,
    /// Blue channel curve.
    pub b: Vec<CurvePoint>,
}

impl Default for CurveSet {
    fn default() -> Self {
        Self {
            rgb: identity_points(),
            r: identity_points(),
            g: identity_points(),
            b: identity_points(),
        }
    }
}

impl CurveSet {
    /// Returns `true` if no curve changes any value.
    ///
    /// A curve counts as changed when it has more than two points, or when
    /// its two points are not the identity endpoints. Curves with fewer than
    /// two points compile to identity and do not count.
    pub fn is_default(&self) -> bool {
        [&self.rgb, &self.r, &self.g, &self.b]
            .into_iter()
            .all(|c| c.len() < 2 || is_identity_pair(c))
    }
}
