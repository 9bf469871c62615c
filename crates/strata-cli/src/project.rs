//! Layered project files.
//!
//! A project is JSON naming a base image and a list of layers, bottom
//! first. Image paths are relative to the project file.
//!
//! ```json
//! {
//!   "base": "photo.png",
//!   "layers": [
//!     { "kind": "image", "adjustments": { "contrast": 20 } },
//!     { "kind": "image", "path": "logo.png", "opacity": 0.8,
//!       "blend_mode": "screen", "transform": { "x": 10, "y": 10 } },
//!     { "kind": "text", "text": "Hello", "x": 20, "y": 60, "shadow": true,
//!       "text_opacity": 0.8 }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use strata_core::RgbaImage;
use strata_layers::{ImageContent, Layer, LayerContent, LayerOptions, LayerStack, StickerContent, TextContent};
use strata_ops::{AdjustmentSet, BlendMode, Transform};
use tracing::debug;

use crate::image_io::read_png;

/// Parsed project file.
#[derive(Debug, Deserialize)]
pub struct Project {
    /// Base image path.
    pub base: PathBuf,
    /// Layers, bottom first.
    #[serde(default)]
    pub layers: Vec<ProjectLayer>,
}

/// One layer entry of a project.
#[derive(Debug, Deserialize)]
pub struct ProjectLayer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub adjustments: AdjustmentSet,
    /// Placement; defaults to the natural size at the origin.
    #[serde(default)]
    pub transform: Option<Transform>,
    /// Opacity of a text layer's glyphs, shadow and outline. `opacity`
    /// above is the layer's own.
    #[serde(default)]
    pub text_opacity: Option<f64>,
    #[serde(flatten)]
    pub source: LayerSource,
}

/// Kind-specific part of a project layer.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerSource {
    /// Pixels from `path`, or the base image when absent.
    Image {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    Text(TextContent),
    Sticker(StickerContent),
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

impl Project {
    /// Parses project JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid project file")
    }

    /// Reads and parses a project file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read: {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    /// Loads the base image and every layer image, resolving paths against
    /// `root`.
    pub fn build(self, root: &Path) -> Result<(RgbaImage, LayerStack)> {
        let base = read_png(&root.join(&self.base))?;
        let mut stack = LayerStack::new();
        for entry in self.layers {
            let layer = entry.into_layer(root)?;
            debug!(name = %layer.name, kind = layer.content.kind(), "project layer");
            stack.push(layer);
        }
        Ok((base, stack))
    }
}

impl ProjectLayer {
    fn into_layer(self, root: &Path) -> Result<Layer> {
        let content: LayerContent = match self.source {
            LayerSource::Image { path: Some(p) } => ImageContent::new(read_png(&root.join(p))?).into(),
            LayerSource::Image { path: None } => ImageContent::base().into(),
            LayerSource::Text(mut t) => {
                if let Some(o) = self.text_opacity {
                    t.opacity = o;
                }
                t.into()
            }
            LayerSource::Sticker(s) => s.into(),
        };
        let options = LayerOptions {
            opacity: self.opacity,
            blend_mode: self.blend_mode,
            locked: self.locked,
        };
        let mut layer = Layer::new(content, self.name, options).with_adjustments(self.adjustments);
        layer.visible = self.visible;
        if let Some(t) = self.transform {
            layer.transform = t;
        }
        Ok(layer)
    }
}
