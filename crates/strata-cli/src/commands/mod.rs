//! CLI command implementations

pub mod adjust;
pub mod curve;
pub mod list;
pub mod render;

use anyhow::{bail, Context, Result};
use strata_lut::CurvePoint;

/// Parses an `x,y` curve control point.
pub fn parse_point(s: &str) -> Result<CurvePoint> {
    let Some((x, y)) = s.split_once(',') else {
        bail!("expected x,y but got {s:?}");
    };
    let x: f64 = x.trim().parse().with_context(|| format!("bad x in {s:?}"))?;
    let y: f64 = y.trim().parse().with_context(|| format!("bad y in {s:?}"))?;
    if !(0.0..=255.0).contains(&x) || !(0.0..=255.0).contains(&y) {
        bail!("curve point {s:?} is outside 0..255");
    }
    Ok(CurvePoint::new(x, y))
}

/// Parses a list of `x,y` points, rejecting repeated x values.
pub fn parse_points(items: &[String]) -> Result<Vec<CurvePoint>> {
    let points = items.iter().map(|s| parse_point(s)).collect::<Result<Vec<_>>>()?;
    for (i, p) in points.iter().enumerate() {
        if points[..i].iter().any(|q| q.x == p.x) {
            bail!("curve has two points at x = {}", p.x);
        }
    }
    Ok(points)
}
