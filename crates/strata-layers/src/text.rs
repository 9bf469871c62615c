//! Text and sticker rasterization.
//!
//! The compositor turns text and sticker layers into pixels through the
//! [`TextRasterizer`] trait. Each call returns a transparent buffer of the
//! full canvas size with the glyphs drawn at their layer position, or
//! `None` when nothing is drawn.
//!
//! [`NoText`] draws nothing. With the `text` feature, `CosmicText` shapes
//! and rasterizes with cosmic-text:
//!
//! - text is anchored at `(x, y)` on its baseline, horizontally by `align`
//! - the outline is the fill coverage grown by one pixel, drawn under the fill
//! - the shadow is black at 70% alpha, offset by (2, 2) and softened by a
//!   small box blur
//! - stickers are drawn in the serif family with the baseline at `y + size`

use strata_core::RgbaImage;
use strata_ops::{BlendMode, OpsResult};
use strata_ops::composite::composite;
use strata_ops::filter::box_blur;

use crate::layer::{StickerContent, TextContent};

/// Shadow offset in pixels, both axes.
pub const SHADOW_OFFSET: i64 = 2;
/// Shadow alpha.
pub const SHADOW_ALPHA: f64 = 0.7;
/// Shadow softening radius in pixels.
pub const SHADOW_BLUR: f64 = 2.0;

/// Rasterizes text and sticker payloads into canvas-sized buffers.
pub trait TextRasterizer {
    /// Draws `text` onto a transparent `width` x `height` buffer.
    fn rasterize_text(&self, text: &TextContent, width: u32, height: u32) -> Option<RgbaImage>;

    /// Draws `sticker` onto a transparent `width` x `height` buffer.
    fn rasterize_sticker(&self, sticker: &StickerContent, width: u32, height: u32) -> Option<RgbaImage>;
}

/// Rasterizer that draws nothing; text and sticker layers are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoText;

impl TextRasterizer for NoText {
    fn rasterize_text(&self, _text: &TextContent, _width: u32, _height: u32) -> Option<RgbaImage> {
        None
    }

    fn rasterize_sticker(&self, _sticker: &StickerContent, _width: u32, _height: u32) -> Option<RgbaImage> {
        None
    }
}

/// Solid `rgb` image whose alpha is `mask` alpha grown by one pixel in
/// every direction (3x3 max).
#[cfg_attr(not(feature = "text"), allow(dead_code))]
pub(crate) fn outline_from(mask: &RgbaImage, rgb: [u8; 3]) -> RgbaImage {
    RgbaImage::from_fn(mask.width(), mask.height(), |x, y| {
        let mut a = 0u8;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(p) = mask.get_pixel(x as i64 + dx, y as i64 + dy) {
                    a = a.max(p[3]);
                }
            }
        }
        [rgb[0], rgb[1], rgb[2], a]
    })
}

/// Drop shadow of `shape`: black, [`SHADOW_ALPHA`] times the shape alpha,
/// shifted by [`SHADOW_OFFSET`] and blurred by [`SHADOW_BLUR`].
#[cfg_attr(not(feature = "text"), allow(dead_code))]
pub(crate) fn shadow_from(shape: &RgbaImage) -> RgbaImage {
    let shifted = RgbaImage::from_fn(shape.width(), shape.height(), |x, y| {
        let a = shape
            .get_pixel(x as i64 - SHADOW_OFFSET, y as i64 - SHADOW_OFFSET)
            .map_or(0, |p| p[3]);
        [0, 0, 0, (a as f64 * SHADOW_ALPHA).round() as u8]
    });
    box_blur(&shifted, SHADOW_BLUR, false)
}

/// Stacks shadow, outline and fill into one buffer with `opacity`.
///
/// Fails when `outline` is not the size of `fill`.
#[cfg_attr(not(feature = "text"), allow(dead_code))]
pub(crate) fn assemble(
    fill: &RgbaImage,
    outline: Option<&RgbaImage>,
    shadow: bool,
    opacity: f64,
) -> OpsResult<RgbaImage> {
    let mut shape = fill.clone();
    if let Some(o) = outline {
        composite(&mut shape, o, 1.0, BlendMode::SourceOver)?;
        composite(&mut shape, fill, 1.0, BlendMode::SourceOver)?;
    }
    let mut out = RgbaImage::new(fill.width(), fill.height());
    if shadow {
        composite(&mut out, &shadow_from(&shape), opacity, BlendMode::SourceOver)?;
    }
    composite(&mut out, &shape, opacity, BlendMode::SourceOver)?;
    Ok(out)
}

#[cfg(feature = "text")]
pub use cosmic::CosmicText;

#[cfg(feature = "text")]
mod cosmic {
    use std::sync::Mutex;

    use cosmic_text::{Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, Style, SwashCache, Weight};
    use strata_core::RgbaImage;
    #[allow(unused_imports)]
    use tracing::{debug, trace, warn};

    use super::{TextRasterizer, assemble, outline_from};
    use crate::layer::{StickerContent, TextAlign, TextContent};

    /// Line height as a multiple of font size.
    const LINE_HEIGHT: f32 = 1.2;

    /// cosmic-text backed rasterizer.
    ///
    /// Owns a font database loaded from the system fonts and a glyph cache.
    pub struct CosmicText {
        font_system: Mutex<FontSystem>,
        swash_cache: Mutex<SwashCache>,
    }

    impl std::fmt::Debug for CosmicText {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("CosmicText").finish_non_exhaustive()
        }
    }

    impl Default for CosmicText {
        fn default() -> Self {
            Self::new()
        }
    }

    struct Run<'a> {
        text: &'a str,
        family: &'a str,
        size: f32,
        bold: bool,
        italic: bool,
        color: [u8; 3],
        align: TextAlign,
        x: f32,
        baseline: f32,
    }

    impl CosmicText {
        /// Loads system fonts.
        pub fn new() -> Self {
            Self::with_font_system(FontSystem::new())
        }

        /// Uses a prepared font system, e.g. one with bundled fonts.
        pub fn with_font_system(font_system: FontSystem) -> Self {
            Self {
                font_system: Mutex::new(font_system),
                swash_cache: Mutex::new(SwashCache::new()),
            }
        }

        /// Shapes and draws one run; `None` if no glyph pixel lands inside.
        fn draw_run(&self, run: &Run<'_>, width: u32, height: u32) -> Option<RgbaImage> {
            if run.text.is_empty() || run.size.is_nan() || run.size <= 0.0 || width == 0 || height == 0 {
                return None;
            }
            let mut fs = self.font_system.lock().unwrap_or_else(|e| e.into_inner());
            let mut cache = self.swash_cache.lock().unwrap_or_else(|e| e.into_inner());

            let family = match run.family.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "sans" => Family::SansSerif,
                "monospace" | "mono" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                _ => Family::Name(run.family),
            };
            let mut attrs = Attrs::new().family(family);
            if run.bold {
                attrs = attrs.weight(Weight::BOLD);
            }
            if run.italic {
                attrs = attrs.style(Style::Italic);
            }

            let mut buffer = Buffer::new(&mut fs, Metrics::new(run.size, run.size * LINE_HEIGHT));
            buffer.set_size(&mut fs, None, None);
            buffer.set_text(&mut fs, run.text, &attrs, Shaping::Advanced);
            buffer.shape_until_scroll(&mut fs, false);

            let mut first_baseline = None;
            let mut line_width = 0.0f32;
            for lr in buffer.layout_runs() {
                first_baseline.get_or_insert(lr.line_y);
                for g in lr.glyphs.iter() {
                    line_width = line_width.max(g.x + g.w);
                }
            }
            let first_baseline = first_baseline?;
            let ox = match run.align {
                TextAlign::Left => run.x,
                TextAlign::Center => run.x - line_width / 2.0,
                TextAlign::Right => run.x - line_width,
            };
            let oy = run.baseline - first_baseline;
            trace!(text = run.text, size = run.size, ox, oy, "text::draw_run");

            let (ox, oy) = (ox.round() as i32, oy.round() as i32);
            let mut out = RgbaImage::new(width, height);
            let mut touched = false;
            let fill = Color::rgba(run.color[0], run.color[1], run.color[2], 255);
            buffer.draw(&mut fs, &mut cache, fill, |x, y, w, h, color| {
                let a = color.a() as f64 / 255.0;
                if a <= 0.0 {
                    return;
                }
                for dy in 0..h as i32 {
                    for dx in 0..w as i32 {
                        let (px, py) = (x + dx + ox, y + dy + oy);
                        if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                            continue;
                        }
                        let (px, py) = (px as u32, py as u32);
                        let d = out.pixel(px, py);
                        let da = d[3] as f64 / 255.0;
                        let oa = a + da * (1.0 - a);
                        let mix = |s: u8, d: u8| {
                            ((s as f64 * a + d as f64 * da * (1.0 - a)) / oa).round().clamp(0.0, 255.0) as u8
                        };
                        out.set_pixel(
                            px,
                            py,
                            [
                                mix(color.r(), d[0]),
                                mix(color.g(), d[1]),
                                mix(color.b(), d[2]),
                                (oa * 255.0).round() as u8,
                            ],
                        );
                        touched = true;
                    }
                }
            });

            if !touched {
                debug!(text = run.text, "text::draw_run produced no pixels");
                return None;
            }
            Some(out)
        }
    }

    impl TextRasterizer for CosmicText {
        fn rasterize_text(&self, text: &TextContent, width: u32, height: u32) -> Option<RgbaImage> {
            let run = Run {
                text: &text.text,
                family: &text.font,
                size: text.size as f32,
                bold: text.bold,
                italic: text.italic,
                color: text.color.0,
                align: text.align,
                x: text.x as f32,
                baseline: text.y as f32,
            };
            let fill = self.draw_run(&run, width, height)?;
            let outline = text.outline.then(|| outline_from(&fill, text.outline_color.0));
            let opacity = if text.opacity.is_nan() { 0.0 } else { text.opacity.clamp(0.0, 1.0) };
            match assemble(&fill, outline.as_ref(), text.shadow, opacity) {
                Ok(img) => Some(img),
                Err(e) => {
                    warn!(error = %e, "text layer dropped");
                    None
                }
            }
        }

        fn rasterize_sticker(&self, sticker: &StickerContent, width: u32, height: u32) -> Option<RgbaImage> {
            let run = Run {
                text: &sticker.glyph,
                family: "serif",
                size: sticker.size as f32,
                bold: false,
                italic: false,
                color: [0, 0, 0],
                align: TextAlign::Left,
                x: sticker.x as f32,
                baseline: (sticker.y + sticker.size) as f32,
            };
            self.draw_run(&run, width, height)
        }
    }

}
