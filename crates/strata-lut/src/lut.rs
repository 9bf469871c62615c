//! 256-entry tone lookup table.

use crate::curve::{build_curve_lut, CurvePoint};
use crate::{LutError, LutResult};

/// Number of entries in a [`ToneLut`].
pub const LUT_SIZE: usize = 256;

/// An 8-bit to 8-bit tone mapping.
///
/// # Example
///
/// ```rust
/// use strata_lut::ToneLut;
///
/// let lut = ToneLut::identity();
/// assert!(lut.is_identity());
/// assert_eq!(lut.apply(17), 17);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToneLut([u8; LUT_SIZE]);

impl ToneLut {
    /// Pass-through table.
    pub fn identity() -> Self {
        let mut t = [0u8; LUT_SIZE];
        for (i, v) in t.iter_mut().enumerate() {
            *v = i as u8;
        }
        Self(t)
    }

    /// Compiles a curve, see [`build_curve_lut`].
    pub fn from_points(points: &[CurvePoint]) -> Self {
        Self(build_curve_lut(points))
    }

    /// Wraps an existing table.
    pub fn from_table(table: [u8; LUT_SIZE]) -> Self {
        Self(table)
    }

    /// Copies a table from a slice of exactly 256 entries.
    pub fn from_slice(table: &[u8]) -> LutResult<Self> {
        let arr: [u8; LUT_SIZE] = table.try_into().map_err(|_| LutError::InvalidSize(table.len()))?;
        Ok(Self(arr))
    }

    /// Looks up one value.
    #[inline]
    pub fn apply(&self, v: u8) -> u8 {
        self.0[v as usize]
    }

    /// Returns `true` if every entry maps to itself.
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &v)| v as usize == i)
    }

    /// Table that applies `self`, then `next`.
    pub fn compose(&self, next: &ToneLut) -> ToneLut {
        let mut t = [0u8; LUT_SIZE];
        for (i, v) in t.iter_mut().enumerate() {
            *v = next.apply(self.0[i]);
        }
        ToneLut(t)
    }

    /// Raw entries.
    pub fn as_table(&self) -> &[u8; LUT_SIZE] {
        &self.0
    }
}

impl Default for ToneLut {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Debug for ToneLut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_identity() {
            f.write_str("ToneLut(identity)")
        } else {
            f.debug_tuple("ToneLut").field(&&self.0[..]).finish()
        }
    }
}
