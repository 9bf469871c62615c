//! # strata-layers
//!
//! Layer stack, compositor and undo history.
//!
//! # Modules
//!
//! - [`layer`] - [`Layer`], its kinds ([`LayerContent`]) and identity ([`LayerId`])
//! - [`stack`] - [`LayerStack`]: ordering, selection, copy-on-write edits, merge-down
//! - [`compositor`] - flattening a stack over a base image
//! - [`text`] - [`TextRasterizer`] for text and sticker layers
//! - [`history`] - bounded snapshot undo/redo
//!
//! # Example
//!
//! ```rust
//! use strata_core::RgbaImage;
//! use strata_layers::{compositor, Layer, LayerStack, NoText};
//! use strata_ops::BlendMode;
//!
//! let base = RgbaImage::filled(8, 8, [40, 80, 120, 255]);
//! let mut stack = LayerStack::new();
//! stack.push(Layer::base());
//! let top = stack.push(Layer::image(RgbaImage::filled(8, 8, [255, 255, 255, 255])));
//! stack.set_blend_mode(top, BlendMode::Multiply);
//!
//! let out = compositor::composite(&stack, &base, &NoText);
//! assert_eq!(out.pixel(3, 3), [40, 80, 120, 255]);
//! ```
//!
//! # Features
//!
//! - `parallel` (default) - row-parallel layer rendering
//! - `text` - `CosmicText` rasterizer backed by cosmic-text

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod compositor;
pub mod history;
pub mod layer;
pub mod stack;
pub mod text;

pub use history::{History, MAX_HISTORY};
pub use layer::{
    Direction, ImageContent, Layer, LayerContent, LayerId, LayerOptions, StickerContent, TextAlign, TextContent,
};
pub use stack::LayerStack;
#[cfg(feature = "text")]
pub use text::CosmicText;
pub use text::{NoText, TextRasterizer};
