//! # strata-core
//!
//! Core types shared by every strata crate.
//!
//! - [`RgbaImage`] - Owned, row-major RGBA8 pixel buffer (straight alpha)
//! - [`pixel`] - Rec.709 luma weights and channel clamping helpers
//! - [`Error`] - Buffer construction errors
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. All other strata crates depend
//! on `strata-core`:
//!
//! ```text
//! strata-core (this crate)
//!    ^
//!    |
//!    +-- strata-color  (color math, presets)
//!    +-- strata-lut    (curve compiler)
//!    +-- strata-ops    (pipeline, filters, blending, canvas)
//!    +-- strata-layers (layer stack, compositor, history)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;

pub use error::{Error, Result};
pub use image::{RgbaImage, CHANNELS};
pub use pixel::{
    clamp_channel, clamp_rgb, luma, round_channel, round_rgb, Rgb, REC709_LUMA, REC709_LUMA_B,
    REC709_LUMA_G, REC709_LUMA_R,
};
