//! Benchmarks for strata operations.
//!
//! Run with: `cargo bench`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use strata_color::{HslShift, Preset};
use strata_core::RgbaImage;
use strata_layers::{compositor, Layer, LayerStack, NoText};
use strata_lut::{build_curve_lut, CurvePoint};
use strata_ops::filter::{box_blur, sharpen};
use strata_ops::pipeline::{apply_adjustments_with, process_with};
use strata_ops::{AdjustmentSet, BlendMode, PipelineOptions, Transform};

fn test_image(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        let v = x.wrapping_mul(31) ^ y.wrapping_mul(17);
        [v as u8, (v >> 3) as u8, (x + y) as u8, 255]
    })
}

fn busy_adjustments() -> AdjustmentSet {
    let mut adj = AdjustmentSet {
        brightness: 10.0,
        contrast: 25.0,
        saturation: -15.0,
        exposure: 20.0,
        vibrance: 30.0,
        filter: Preset::Vintage,
        filter_intensity: 70.0,
        ..AdjustmentSet::default()
    };
    adj.hsl.blues = HslShift { hue: 20.0, saturation: 10.0, lightness: -5.0 };
    adj.curves.rgb = vec![
        CurvePoint::new(0.0, 10.0),
        CurvePoint::new(64.0, 50.0),
        CurvePoint::new(192.0, 210.0),
        CurvePoint::new(255.0, 245.0),
    ];
    adj
}

/// Benchmark curve compilation.
fn bench_curve(c: &mut Criterion) {
    let points = busy_adjustments().curves.rgb;
    c.bench_function("curve/build_lut_4pt", |b| b.iter(|| build_curve_lut(black_box(&points))));
}

/// Benchmark the per-pixel color pass.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let adj = busy_adjustments();

    for size in [256u32, 1024] {
        let img = test_image(size, size);
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("color_seq", size), &img, |b, img| {
            b.iter(|| apply_adjustments_with(black_box(img), &adj, &PipelineOptions::sequential()))
        });
        group.bench_with_input(BenchmarkId::new("color_par", size), &img, |b, img| {
            b.iter(|| apply_adjustments_with(black_box(img), &adj, &PipelineOptions::default()))
        });

        let full = AdjustmentSet { sharpen: 40.0, blur: 2.0, ..adj.clone() };
        group.bench_with_input(BenchmarkId::new("process", size), &img, |b, img| {
            b.iter(|| process_with(black_box(img), &full, &PipelineOptions::default()))
        });
    }

    group.finish();
}

/// Benchmark spatial filters.
fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let img = test_image(512, 512);
    group.throughput(Throughput::Elements(512 * 512));

    group.bench_function("sharpen", |b| b.iter(|| sharpen(black_box(&img), 50.0, true)));
    for radius in [3.0, 15.0, 60.0] {
        group.bench_with_input(BenchmarkId::new("box_blur", radius), &radius, |b, &r| {
            b.iter(|| box_blur(black_box(&img), r, true))
        });
    }

    group.finish();
}

/// Benchmark flattening a small stack.
fn bench_composite(c: &mut Criterion) {
    let base = test_image(512, 512);
    let mut stack = LayerStack::new();
    stack.push(Layer::base().with_adjustments(busy_adjustments()));
    stack.push(Layer::image(test_image(256, 256)).with_blend_mode(BlendMode::Overlay).with_opacity(0.6));
    stack.push(
        Layer::image(test_image(128, 128))
            .with_blend_mode(BlendMode::Screen)
            .with_transform(Transform { x: 100.0, y: 80.0, rotation: 30.0, scale_x: 1.5, ..Transform::for_size(128, 128) }),
    );

    c.bench_function("composite/3_layers_512", |b| {
        b.iter(|| compositor::composite(black_box(&stack), &base, &NoText))
    });
}

criterion_group!(benches, bench_curve, bench_pipeline, bench_filters, bench_composite);
criterion_main!(benches);
