//! Flattening a layer stack into one buffer.
//!
//! Layers are drawn bottom to top onto a transparent canvas the size of the
//! base image. Hidden layers are skipped. Image layers run through the
//! adjustment pipeline and are placed by their transform; text and sticker
//! layers are rasterized at canvas size and drawn at the origin. Every draw
//! uses the layer's opacity and blend mode.

use std::borrow::Cow;

use strata_core::RgbaImage;
use strata_ops::pipeline::process_with;
use strata_ops::{Canvas, PipelineOptions, Transform};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::layer::{Layer, LayerContent};
use crate::stack::LayerStack;
use crate::text::TextRasterizer;

/// Flattens `stack` over a canvas the size of `base`.
///
/// # Example
///
/// ```rust
/// use strata_core::RgbaImage;
/// use strata_layers::{compositor, Layer, LayerStack, NoText};
///
/// let base = RgbaImage::filled(4, 4, [10, 20, 30, 255]);
/// let mut stack = LayerStack::new();
/// stack.push(Layer::base());
///
/// let out = compositor::composite(&stack, &base, &NoText);
/// assert_eq!(out, base);
/// ```
pub fn composite(stack: &LayerStack, base: &RgbaImage, text: &dyn TextRasterizer) -> RgbaImage {
    composite_with(stack, base, text, &PipelineOptions::default())
}

/// [`composite`] with explicit pipeline options.
pub fn composite_with(
    stack: &LayerStack,
    base: &RgbaImage,
    text: &dyn TextRasterizer,
    opts: &PipelineOptions,
) -> RgbaImage {
    let (w, h) = base.dimensions();
    trace!(width = w, height = h, layers = stack.len(), "compositor::composite");

    let mut canvas = Canvas::new(w, h);
    for layer in stack.iter() {
        if !layer.visible {
            continue;
        }
        draw_layer(&mut canvas, layer, base, text, opts);
    }
    canvas.into_image()
}

/// Draws one layer onto `canvas`, ignoring its visibility flag.
pub fn draw_layer(
    canvas: &mut Canvas,
    layer: &Layer,
    base: &RgbaImage,
    text: &dyn TextRasterizer,
    opts: &PipelineOptions,
) {
    let (w, h) = (canvas.width(), canvas.height());
    match &layer.content {
        LayerContent::Image(_) => {
            let pixels = render_image_layer(layer, base, opts);
            let placement = placement_for(&layer.transform, pixels.width(), pixels.height());
            let map = placement.to_affine(pixels.width(), pixels.height());
            canvas.draw_image(&pixels, &map, layer.opacity, layer.blend_mode);
        }
        LayerContent::Text(t) => match text.rasterize_text(t, w, h) {
            Some(img) => canvas.draw_image_at(&img, 0.0, 0.0, layer.opacity, layer.blend_mode),
            None => debug!(layer = %layer.id, "compositor: text layer drew nothing"),
        },
        LayerContent::Sticker(s) => match text.rasterize_sticker(s, w, h) {
            Some(img) => canvas.draw_image_at(&img, 0.0, 0.0, layer.opacity, layer.blend_mode),
            None => debug!(layer = %layer.id, "compositor: sticker layer drew nothing"),
        },
    }
}

/// Source pixels of an image layer after its adjustments, sharpen and blur.
///
/// Layers without own pixels process `base`. Non-image layers return `base`
/// unchanged.
pub fn render_image_layer<'a>(layer: &'a Layer, base: &'a RgbaImage, opts: &PipelineOptions) -> Cow<'a, RgbaImage> {
    let src: &RgbaImage = layer.content.pixels().map_or(base, |p| p.as_ref());
    if !layer.is_image() || layer.adjustments.is_identity() {
        return Cow::Borrowed(src);
    }
    Cow::Owned(process_with(src, &layer.adjustments, opts))
}

/// `t`, or the natural size of the source when `t` has no size.
pub(crate) fn placement_for(t: &Transform, src_w: u32, src_h: u32) -> Transform {
    if t.width == 0.0 && t.height == 0.0 {
        Transform {
            width: src_w as f64,
            height: src_h as f64,
            ..*t
        }
    } else {
        *t
    }
}
