//! # strata-lut
//!
//! Tone curves compiled to 8-bit lookup tables.
//!
//! A curve is a list of `(x, y)` control points in `[0, 255]²`. It is
//! compiled once into a 256-entry [`ToneLut`] and then applied per channel
//! by the adjustment pipeline.
//!
//! # Interpolation
//!
//! - fewer than 2 points: identity
//! - 2 points: linear, held flat outside the endpoints
//! - 3+ points: monotone cubic Hermite (Fritsch-Carlson tangents)
//!
//! # Usage
//!
//! ```rust
//! use strata_lut::{CurvePoint, ToneLut};
//!
//! let lut = ToneLut::from_points(&[CurvePoint::new(0.0, 50.0), CurvePoint::new(255.0, 200.0)]);
//! assert_eq!(lut.apply(0), 50);
//! assert_eq!(lut.apply(255), 200);
//! ```
//!
//! # Dependencies
//!
//! - [`strata-core`] - channel rounding
//! - [`serde`] - serializable curve sets
//! - [`thiserror`] - error handling
//!
//! # Used By
//!
//! - `strata-ops` - the curves stage of the adjustment pipeline

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod curve;
mod error;
mod lut;

pub use curve::{build_curve_lut, CurvePoint, CurveSet};
pub use error::{LutError, LutResult};
pub use lut::{ToneLut, LUT_SIZE};
