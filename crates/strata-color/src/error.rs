//! Error types for color parameter parsing.

use thiserror::Error;

/// Color parameter error.
#[derive(Debug, Error)]
pub enum ColorError {
    /// String is not a `#rrggbb` color.
    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),

    /// Preset name is not in the preset table.
    #[error("unknown preset filter: {0:?}")]
    UnknownPreset(String),
}

/// Result type for color operations.
pub type ColorResult<T> = Result<T, ColorError>;
