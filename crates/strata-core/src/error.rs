//! Error types for strata-core operations.
//!
//! The core crate only fails when a pixel buffer is constructed from data
//! that does not match its declared dimensions. Everything downstream of a
//! valid [`RgbaImage`](crate::RgbaImage) is infallible by construction.
//!
//! # Usage
//!
//! ```rust
//! use strata_core::{Error, RgbaImage};
//!
//! let err = RgbaImage::from_raw(2, 2, vec![0; 3]).unwrap_err();
//! assert!(matches!(err, Error::InvalidDimensions { .. }));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or combining pixel buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Image dimensions don't match for the operation.
    ///
    /// Returned when an operation requires images of the same size.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First image width
        a_width: u32,
        /// First image height
        a_height: u32,
        /// Second image width
        b_width: u32,
        /// Second image height
        b_height: u32,
    },

    /// Invalid image dimensions.
    ///
    /// Returned when the raw sample count does not equal `width * height * 4`,
    /// or the size calculation would overflow.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }
}
