//! Integration tests for layer stack behavior and compositing.

use strata_core::RgbaImage;
use strata_layers::{compositor, Direction, History, Layer, LayerContent, LayerStack, NoText, MAX_HISTORY};
use strata_lut::CurvePoint;
use strata_ops::{AdjustmentSet, BlendMode, Transform};

fn gradient(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| [(x * 30) as u8, (y * 40) as u8, ((x + y) * 10) as u8, 255])
}

#[test]
fn test_default_layer_is_noop() {
    let base = gradient(6, 5);
    let mut stack = LayerStack::new();
    stack.push(Layer::base());
    assert_eq!(compositor::composite(&stack, &base, &NoText), base);
}

#[test]
fn test_white_curve_through_compositor() {
    let base = RgbaImage::filled(2, 2, [255, 255, 255, 255]);
    let mut adj = AdjustmentSet::default();
    adj.curves.rgb = vec![CurvePoint::new(0.0, 50.0), CurvePoint::new(255.0, 200.0)];
    let mut stack = LayerStack::new();
    stack.push(Layer::base().with_adjustments(adj));
    let out = compositor::composite(&stack, &base, &NoText);
    assert!(out.pixels().all(|p| p == [200, 200, 200, 255]));
}

#[test]
fn test_merge_down_opaque_top_replaces_pixels() {
    let top = gradient(4, 4);
    let mut stack = LayerStack::new();
    let bottom = stack.push(Layer::image(RgbaImage::filled(4, 4, [9, 9, 9, 255])));
    let upper = stack.push(Layer::image(top.clone()));
    assert!(stack.merge_down(upper, None));
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.active_id(), Some(bottom));
    let merged = stack.get(bottom).and_then(|l| l.content.pixels()).unwrap();
    assert_eq!(merged.as_ref(), &top);
}

#[test]
fn test_merge_down_applies_upper_transform() {
    let mut stack = LayerStack::new();
    let bottom = stack.push(Layer::image(RgbaImage::new(4, 4)));
    let dot = Layer::image(RgbaImage::filled(1, 1, [255, 0, 0, 255]))
        .with_transform(Transform { x: 3.0, y: 1.0, ..Transform::for_size(1, 1) });
    let upper = stack.push(dot);
    assert!(stack.merge_down(upper, None));
    let merged = stack.get(bottom).and_then(|l| l.content.pixels()).unwrap();
    assert_eq!(merged.pixel(3, 1), [255, 0, 0, 255]);
    assert_eq!(merged.pixels().filter(|p| p[3] != 0).count(), 1);
}

#[test]
fn test_move_boundaries_are_noops() {
    let mut stack = LayerStack::new();
    let a = stack.push(Layer::base().with_name("a"));
    let b = stack.push(Layer::base().with_name("b"));
    let before = stack.clone();
    assert!(!stack.move_layer(a, Direction::Down));
    assert!(!stack.move_layer(b, Direction::Up));
    assert_eq!(stack, before);
}

#[test]
fn test_composite_order_matters() {
    let base = RgbaImage::new(1, 1);
    let red = || Layer::image(RgbaImage::filled(1, 1, [255, 0, 0, 255])).with_opacity(0.5);
    let blue = || Layer::image(RgbaImage::filled(1, 1, [0, 0, 255, 255])).with_opacity(0.5);

    let mut rb = LayerStack::new();
    rb.push(red());
    rb.push(blue());
    let mut br = LayerStack::new();
    br.push(blue());
    br.push(red());

    let x = compositor::composite(&rb, &base, &NoText);
    let y = compositor::composite(&br, &base, &NoText);
    assert_ne!(x, y);
    assert!(x.pixel(0, 0)[2] > x.pixel(0, 0)[0]);
    assert!(y.pixel(0, 0)[0] > y.pixel(0, 0)[2]);
}

#[test]
fn test_blend_mode_order_matters() {
    let base = RgbaImage::filled(1, 1, [128, 128, 128, 255]);
    let multiply = || {
        Layer::image(RgbaImage::filled(1, 1, [200, 50, 100, 255]))
            .with_blend_mode(BlendMode::Multiply)
            .with_opacity(0.5)
    };
    let screen = || {
        Layer::image(RgbaImage::filled(1, 1, [30, 220, 160, 255]))
            .with_blend_mode(BlendMode::Screen)
            .with_opacity(0.5)
    };

    let mut ms = LayerStack::new();
    ms.push(Layer::base());
    ms.push(multiply());
    ms.push(screen());
    let mut sm = LayerStack::new();
    sm.push(Layer::base());
    sm.push(screen());
    sm.push(multiply());

    let x = compositor::composite(&ms, &base, &NoText).pixel(0, 0);
    let y = compositor::composite(&sm, &base, &NoText).pixel(0, 0);
    assert_ne!(x, y);
    // Screen last lifts green well above multiply last.
    assert!(x[1] > y[1] + 20);
    assert_eq!((x[3], y[3]), (255, 255));
}

#[test]
fn test_rotation_places_around_center() {
    let base = RgbaImage::new(8, 8);
    let layer = Layer::image(RgbaImage::filled(4, 2, [0, 200, 0, 255]))
        .with_transform(Transform { x: 2.0, y: 3.0, rotation: 90.0, ..Transform::for_size(4, 2) });
    let mut stack = LayerStack::new();
    stack.push(layer);
    let out = compositor::composite(&stack, &base, &NoText);

    // The 4x2 box centered at (4, 4) becomes 2x4 spanning x 3..5, y 2..6.
    for y in 0..8 {
        for x in 0..8 {
            let inside = (3..5).contains(&x) && (2..6).contains(&y);
            let expect = if inside { [0, 200, 0, 255] } else { [0, 0, 0, 0] };
            assert_eq!(out.pixel(x, y), expect, "({x}, {y})");
        }
    }
}

#[test]
fn test_layer_serde_roundtrip() {
    let mut adj = AdjustmentSet::default();
    adj.vibrance = 35.0;
    let layer = Layer::image(gradient(3, 2))
        .with_name("Photo")
        .with_blend_mode(BlendMode::SoftLight)
        .with_adjustments(adj)
        .with_opacity(0.75);

    let json = serde_json::to_string(&layer).unwrap();
    let back: Layer = serde_json::from_str(&json).unwrap();
    assert_eq!(back, layer);
    let LayerContent::Image(img) = &back.content else { panic!("not an image layer") };
    assert_eq!(img.pixels.as_deref(), Some(&gradient(3, 2)));
}

#[test]
fn test_stack_serde_roundtrip() {
    let mut stack = LayerStack::new();
    stack.push(Layer::base());
    stack.push(Layer::image(gradient(2, 2)));
    let json = serde_json::to_string(&stack).unwrap();
    let back: LayerStack = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stack);
    assert_eq!(back.active_id(), stack.active_id());
}

#[test]
fn test_history_bound_and_redo_discard() {
    let mut h = History::new();
    for v in 0..25u8 {
        h.push(RgbaImage::filled(1, 1, [v, 0, 0, 255]));
    }
    assert_eq!(h.len(), MAX_HISTORY);
    assert!(h.can_undo());
    assert!(!h.can_redo());
    assert_eq!(h.current().map(|img| img.pixel(0, 0)[0]), Some(24));
    assert_eq!(h.undo().map(|img| img.pixel(0, 0)[0]), Some(23));
    h.undo();
    h.undo();
    assert!(h.can_redo());
    h.push(RgbaImage::filled(1, 1, [99, 0, 0, 255]));
    assert!(!h.can_redo());
    assert_eq!(h.len(), MAX_HISTORY - 2);
}
