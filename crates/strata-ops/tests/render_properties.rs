//! Whole-image properties of the adjustment pipeline.

use strata_core::RgbaImage;
use strata_lut::CurvePoint;
use strata_ops::pipeline::{process, process_with};
use strata_ops::{AdjustmentSet, PipelineOptions};

fn ramp() -> RgbaImage {
    RgbaImage::from_fn(256, 1, |x, _| [x as u8, x as u8, x as u8, 255])
}

fn noise(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        let v = (x * 73 + y * 151 + (x ^ y) * 29) % 256;
        [v as u8, (v * 3 % 256) as u8, (255 - v) as u8, (v / 2 + 128) as u8]
    })
}

#[test]
fn test_default_set_is_bit_identical() {
    let img = noise(23, 17);
    assert_eq!(process(&img, &AdjustmentSet::default()), img);
    assert_eq!(process_with(&img, &AdjustmentSet::default(), &PipelineOptions::sequential()), img);
}

#[test]
fn test_monotone_curve_keeps_ramp_ordered() {
    let mut adj = AdjustmentSet::default();
    adj.curves.rgb = vec![
        CurvePoint::new(0.0, 0.0),
        CurvePoint::new(60.0, 20.0),
        CurvePoint::new(128.0, 160.0),
        CurvePoint::new(200.0, 230.0),
        CurvePoint::new(255.0, 255.0),
    ];
    let out = process(&ramp(), &adj);
    let reds: Vec<u8> = out.pixels().map(|p| p[0]).collect();
    assert!(reds.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!((reds[0], reds[255]), (0, 255));
}

#[test]
fn test_contrast_beyond_cap_matches_cap() {
    let img = noise(16, 8);
    let capped = AdjustmentSet { contrast: 254.0, ..AdjustmentSet::default() };
    let huge = AdjustmentSet { contrast: 10_000.0, ..AdjustmentSet::default() };
    assert_eq!(process(&img, &huge), process(&img, &capped));
}

#[test]
fn test_negative_spatial_amounts_are_off() {
    let img = noise(9, 9);
    let adj = AdjustmentSet { blur: -4.0, sharpen: -30.0, ..AdjustmentSet::default() };
    assert_eq!(process(&img, &adj), img);
}

#[test]
fn test_full_render_parallel_matches_sequential() {
    let img = noise(41, 29);
    let adj = AdjustmentSet {
        brightness: -12.0,
        vibrance: 40.0,
        sharpen: 55.0,
        blur: 1.0,
        ..AdjustmentSet::default()
    };
    let par = process_with(&img, &adj, &PipelineOptions { parallel: true });
    let seq = process_with(&img, &adj, &PipelineOptions::sequential());
    assert_eq!(par, seq);
}
