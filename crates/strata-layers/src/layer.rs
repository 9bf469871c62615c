//! Layer data model.
//!
//! A [`Layer`] carries the fields every layer kind shares (name, visibility,
//! opacity, blend mode, lock, adjustments, placement) plus a
//! [`LayerContent`] payload. Pixel buffers are held in an `Arc`, so cloning
//! a layer or a whole stack never copies pixels.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use strata_color::HexColor;
use strata_core::RgbaImage;
use strata_ops::{AdjustmentSet, BlendMode, Transform};
use uuid::Uuid;

static LAYER_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Next `"Layer N"` name. Numbering is process-wide and starts at 1.
pub fn next_layer_name() -> String {
    format!("Layer {}", LAYER_COUNTER.fetch_add(1, Ordering::Relaxed) + 1)
}

/// Stable layer identity (random UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(Uuid);

impl LayerId {
    /// Fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Horizontal anchor of a text run relative to its `x` position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// `x` is the left edge.
    #[default]
    Left,
    /// `x` is the center.
    Center,
    /// `x` is the right edge.
    Right,
}

/// Raster layer payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageContent {
    /// Own pixels. `None` renders the base image instead.
    pub pixels: Option<Arc<RgbaImage>>,
}

impl ImageContent {
    /// Content holding `pixels`.
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Some(Arc::new(pixels)),
        }
    }

    /// Content that borrows the base image.
    pub fn base() -> Self {
        Self { pixels: None }
    }
}

/// Text layer payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    /// The text to draw.
    pub text: String,
    /// Font family name, or one of `serif`, `sans-serif`, `monospace`.
    pub font: String,
    /// Font size in pixels.
    pub size: f64,
    /// Bold weight.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
    /// Fill color.
    pub color: HexColor,
    /// Anchor of `x`.
    pub align: TextAlign,
    /// Anchor x.
    pub x: f64,
    /// Baseline y.
    pub y: f64,
    /// Soft black drop shadow.
    pub shadow: bool,
    /// Stroke the glyph outlines before filling.
    pub outline: bool,
    /// Stroke color.
    pub outline_color: HexColor,
    /// Alpha of the text itself, applied before the layer opacity.
    pub opacity: f64,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: "sans-serif".into(),
            size: 32.0,
            bold: false,
            italic: false,
            color: HexColor::new(0xff, 0xff, 0xff),
            align: TextAlign::Left,
            x: 0.0,
            y: 0.0,
            shadow: false,
            outline: false,
            outline_color: HexColor::new(0, 0, 0),
            opacity: 1.0,
        }
    }
}

impl TextContent {
    /// Text at `(x, y)` with default styling.
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            ..Self::default()
        }
    }
}

/// Sticker (single emoji or glyph) payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerContent {
    /// Glyph string, usually one emoji.
    pub glyph: String,
    /// Left edge.
    pub x: f64,
    /// Top edge; the baseline sits at `y + size`.
    pub y: f64,
    /// Glyph size in pixels.
    pub size: f64,
}

impl Default for StickerContent {
    fn default() -> Self {
        Self {
            glyph: String::new(),
            x: 0.0,
            y: 0.0,
            size: 64.0,
        }
    }
}

impl StickerContent {
    /// Sticker `glyph` at `(x, y)`.
    pub fn new(glyph: impl Into<String>, x: f64, y: f64, size: f64) -> Self {
        Self {
            glyph: glyph.into(),
            x,
            y,
            size,
        }
    }
}

/// Kind-specific payload of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerContent {
    /// Raster pixels, processed by the adjustment pipeline.
    Image(ImageContent),
    /// Rasterized text.
    Text(TextContent),
    /// Rasterized glyph.
    Sticker(StickerContent),
}

impl LayerContent {
    /// Short kind name: `image`, `text` or `sticker`.
    pub fn kind(&self) -> &'static str {
        match self {
            LayerContent::Image(_) => "image",
            LayerContent::Text(_) => "text",
            LayerContent::Sticker(_) => "sticker",
        }
    }

    /// Returns `true` for raster content.
    pub fn is_image(&self) -> bool {
        matches!(self, LayerContent::Image(_))
    }

    /// Own pixels of an image layer.
    pub fn pixels(&self) -> Option<&Arc<RgbaImage>> {
        match self {
            LayerContent::Image(img) => img.pixels.as_ref(),
            _ => None,
        }
    }
}

impl From<ImageContent> for LayerContent {
    fn from(c: ImageContent) -> Self {
        LayerContent::Image(c)
    }
}

impl From<TextContent> for LayerContent {
    fn from(c: TextContent) -> Self {
        LayerContent::Text(c)
    }
}

impl From<StickerContent> for LayerContent {
    fn from(c: StickerContent) -> Self {
        LayerContent::Sticker(c)
    }
}

/// Creation options shared by all layer kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerOptions {
    /// Layer opacity, clamped to 0..1.
    pub opacity: f64,
    /// Blend mode.
    pub blend_mode: BlendMode,
    /// Locked flag.
    pub locked: bool,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            blend_mode: BlendMode::SourceOver,
            locked: false,
        }
    }
}

/// Stack move direction. `Up` is toward the top (later in the stack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the top.
    Up,
    /// Toward the bottom.
    Down,
}

impl Direction {
    /// Index offset of the neighbor.
    pub fn offset(self) -> isize {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// One entry of a [`LayerStack`](crate::LayerStack).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Identity.
    pub id: LayerId,
    /// Display name.
    pub name: String,
    /// Hidden layers are skipped by the compositor.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Draw alpha, 0..1.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Blend mode used when drawing the layer.
    #[serde(default)]
    pub blend_mode: BlendMode,
    /// Edit lock. Stored only; stack operations ignore it.
    #[serde(default)]
    pub locked: bool,
    /// Color and filter parameters. Used by image layers.
    #[serde(default)]
    pub adjustments: AdjustmentSet,
    /// Placement. Used by image layers.
    #[serde(default)]
    pub transform: Transform,
    /// Kind and payload.
    pub content: LayerContent,
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

impl Layer {
    /// Builds a layer with a fresh id.
    ///
    /// `name` defaults to the next `"Layer N"`. The transform is sized to
    /// the layer's own pixels, or left at zero size when there are none.
    pub fn new(content: impl Into<LayerContent>, name: Option<String>, options: LayerOptions) -> Self {
        let content = content.into();
        let transform = match content.pixels() {
            Some(px) => Transform::for_size(px.width(), px.height()),
            None => Transform::default(),
        };
        Self {
            id: LayerId::new(),
            name: name.unwrap_or_else(next_layer_name),
            visible: true,
            opacity: clamp_opacity(options.opacity),
            blend_mode: options.blend_mode,
            locked: options.locked,
            adjustments: AdjustmentSet::default(),
            transform,
            content,
        }
    }

    /// Image layer with default options.
    pub fn image(pixels: RgbaImage) -> Self {
        Self::new(ImageContent::new(pixels), None, LayerOptions::default())
    }

    /// Image layer that renders the base image.
    pub fn base() -> Self {
        Self::new(ImageContent::base(), None, LayerOptions::default())
    }

    /// Text layer with default options.
    pub fn text(content: TextContent) -> Self {
        Self::new(content, None, LayerOptions::default())
    }

    /// Sticker layer with default options.
    pub fn sticker(content: StickerContent) -> Self {
        Self::new(content, None, LayerOptions::default())
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets opacity, clamped to 0..1.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = clamp_opacity(opacity);
        self
    }

    /// Sets the blend mode.
    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    /// Sets the adjustments.
    pub fn with_adjustments(mut self, adjustments: AdjustmentSet) -> Self {
        self.adjustments = adjustments;
        self
    }

    /// Sets the transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Returns `true` for image layers.
    pub fn is_image(&self) -> bool {
        self.content.is_image()
    }

    /// Copy with a fresh id, `"<name> copy"` name and cleared lock.
    pub fn duplicate(&self) -> Self {
        Self {
            id: LayerId::new(),
            name: format!("{} copy", self.name),
            locked: false,
            ..self.clone()
        }
    }
}

/// Clamps opacity to 0..1; NaN becomes 0.
pub(crate) fn clamp_opacity(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_layer_sized_from_pixels() {
        let layer = Layer::image(RgbaImage::new(40, 30));
        assert_eq!(layer.transform, Transform::for_size(40, 30));
        assert!(layer.visible);
        assert_eq!(layer.opacity, 1.0);
        assert_eq!(layer.blend_mode, BlendMode::SourceOver);
        assert!(layer.adjustments.is_identity());
        assert!(layer.name.starts_with("Layer "));
    }

    #[test]
    fn test_default_names_count_up() {
        let a = Layer::base();
        let b = Layer::base();
        let n = |l: &Layer| l.name["Layer ".len()..].parse::<u64>().unwrap();
        assert!(n(&b) > n(&a));
    }

    #[test]
    fn test_options_clamped() {
        let opts = LayerOptions { opacity: 3.0, blend_mode: BlendMode::Screen, locked: true };
        let l = Layer::new(TextContent::new("hi", 1.0, 2.0), Some("Title".into()), opts);
        assert_eq!(l.name, "Title");
        assert_eq!(l.opacity, 1.0);
        assert!(l.locked);
        assert_eq!(l.transform, Transform::default());
        assert_eq!(l.content.kind(), "text");
    }

    #[test]
    fn test_duplicate() {
        let l = Layer::image(RgbaImage::new(2, 2)).with_name("Sky");
        let mut locked = l.clone();
        locked.locked = true;
        let d = locked.duplicate();
        assert_ne!(d.id, l.id);
        assert_eq!(d.name, "Sky copy");
        assert!(!d.locked);
        assert_eq!(d.content, l.content);
    }

    #[test]
    fn test_serde_shape() {
        let l = Layer::sticker(StickerContent::new("*", 3.0, 4.0, 20.0)).with_blend_mode(BlendMode::ColorDodge);
        let v = serde_json::to_value(&l).unwrap();
        assert_eq!(v["content"]["kind"], "sticker");
        assert_eq!(v["content"]["glyph"], "*");
        assert_eq!(v["blend_mode"], "color-dodge");
        assert_eq!(v["id"].as_str().unwrap(), l.id.to_string());
    }

    #[test]
    fn test_text_defaults_from_sparse_json() {
        let json = r##"{"name":"T","id":"67e55044-10b1-426f-9247-bb680e5fe0c8",
            "content":{"kind":"text","text":"Hello","color":"#ff8800","align":"center"}}"##;
        let l: Layer = serde_json::from_str(json).unwrap();
        assert!(l.visible);
        assert_eq!(l.opacity, 1.0);
        let LayerContent::Text(t) = &l.content else { panic!("not text") };
        assert_eq!(t.color, HexColor::new(0xff, 0x88, 0x00));
        assert_eq!(t.align, TextAlign::Center);
        assert_eq!(t.opacity, 1.0);
        assert_eq!(t.size, 32.0);
    }
}
