//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Blend mode name is not one of the canvas composite operations.
    #[error("unknown blend mode: {0:?}")]
    UnknownBlendMode(String),

    /// Buffer size or shape error.
    #[error(transparent)]
    Image(#[from] strata_core::Error),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
