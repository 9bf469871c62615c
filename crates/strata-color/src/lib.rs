//! # strata-color
//!
//! Stateless per-pixel color math used by the strata adjustment pipeline.
//!
//! Every function takes and returns an RGB triple on the 0-255 scale
//! ([`Rgb`](strata_core::Rgb), `[f64; 3]`). Inputs are not clamped unless a
//! function says so; the pipeline decides where to quantize.
//!
//! - [`adjust`] - brightness, contrast, exposure, saturation, vibrance, distance
//! - [`hsl`] - RGB <-> HSL conversion and the seven selective hue bands
//! - [`balance`] - shadows/midtones/highlights color balance
//! - [`preset`] - named one-shot looks (sepia, noir, ...)
//! - [`hex`] - `#rrggbb` parsing and formatting
//!
//! # Quick Start
//!
//! ```rust
//! use strata_color::adjust::{brightness, contrast};
//! use strata_color::hsl::{hue_band, rgb_to_hsl, HueBand};
//!
//! let px = contrast(brightness([100.0, 120.0, 140.0], 10.0), 20.0);
//! let [h, _, _] = rgb_to_hsl([255.0, 0.0, 0.0]);
//! assert_eq!(hue_band(h), HueBand::Reds);
//! # let _ = px;
//! ```
//!
//! # Dependencies
//!
//! - [`strata-core`] - luma weights and channel helpers
//! - [`serde`] - serializable parameter types
//! - [`thiserror`] - error handling

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod adjust;
pub mod balance;
mod error;
pub mod hex;
pub mod hsl;
pub mod preset;

pub use adjust::color_distance;
pub use balance::{BalanceShift, ColorBalance, TonalRange, TonalWeights};
pub use error::{ColorError, ColorResult};
pub use hex::HexColor;
pub use hsl::{HslAdjustments, HslShift, HueBand};
pub use preset::Preset;
