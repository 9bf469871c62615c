//! # strata-ops
//!
//! Image operations behind non-destructive layer editing.
//!
//! # Modules
//!
//! - [`adjustments`] - [`AdjustmentSet`], the serializable edit parameters of a layer
//! - [`pipeline`] - per-pixel adjustment pass plus sharpen/blur
//! - [`filter`] - 3x3 sharpen and box blur on RGBA8 buffers
//! - [`composite`] - W3C separable blend modes and source-over
//! - [`transform`] - layer placement (position, size, rotation, scale)
//! - [`canvas`] - drawing surface: draw one buffer onto another with alpha and blend
//!
//! # Example
//!
//! ```rust
//! use strata_core::RgbaImage;
//! use strata_ops::{pipeline, AdjustmentSet};
//!
//! let img = RgbaImage::filled(4, 4, [120, 80, 40, 255]);
//!
//! let mut adj = AdjustmentSet::default();
//! adj.brightness = 10.0;
//! adj.saturation = -100.0;
//!
//! let out = pipeline::process(&img, &adj);
//! let [r, g, b, a] = out.pixel(0, 0);
//! assert_eq!((r, a), (g, 255));
//! # let _ = b;
//! ```
//!
//! # Features
//!
//! - `parallel` (default) - row-parallel pipeline and filters via rayon

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod adjustments;
pub mod canvas;
pub mod composite;
mod error;
pub mod filter;
mod parallel;
pub mod pipeline;
pub mod transform;

pub use adjustments::{AdjustmentSet, ColorReplace};
pub use canvas::Canvas;
pub use composite::BlendMode;
pub use error::{OpsError, OpsResult};
pub use pipeline::PipelineOptions;
pub use transform::{Affine, Transform};
