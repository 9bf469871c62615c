//! Row scheduling for full-image passes.
//!
//! Every pass in this crate writes one destination row from read-only
//! inputs, so rows can run in any order. With the `parallel` feature the
//! rows go through rayon's `par_chunks_mut`; without it, or when the caller
//! asks for sequential execution, they run in order on the calling thread.
//! Both paths produce identical bytes.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls `f(y, row)` for every `row_len`-byte row of `dst`.
///
/// `row_len` must be non-zero.
pub(crate) fn for_each_row<F>(dst: &mut [u8], row_len: usize, parallel: bool, f: F)
where
    F: Fn(usize, &mut [u8]) + Send + Sync,
{
    if row_len == 0 || dst.is_empty() {
        return;
    }

    #[cfg(feature = "parallel")]
    {
        if parallel {
            dst.par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| f(y, row));
            return;
        }
    }

    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    dst.chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}
