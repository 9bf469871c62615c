//! LUT error types.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur building a lookup table.
#[derive(Debug, Error)]
pub enum LutError {
    /// Table does not have exactly 256 entries.
    #[error("invalid LUT size: expected 256 entries, got {0}")]
    InvalidSize(usize),
}
