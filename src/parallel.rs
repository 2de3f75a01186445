//! Work-splitting helpers for the parallel builder (C4).
//!
//! Unlike the cache-heuristic, power-of-two-aligned splitting used for
//! hashing workloads, the builder's partitioning (spec §4.2) needs a plain
//! even split of `C` chunk indices across `p` workers: contiguous, covering,
//! `ceil(C/p)` chunks per worker. The `WorkSplit` carrier type and the
//! `par_map` runner (transparent sequential fallback without `rayon`) are
//! kept from the same shape used for NMT layer hashing.

use crate::rmm::ceil_div;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WorkSplit {
    /// Start chunk index (inclusive).
    pub start: usize,
    /// End chunk index (exclusive).
    pub end: usize,
}

impl WorkSplit {
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `[0, chunk_count)` into up to `workers` contiguous, covering
/// slices of `ceil(chunk_count / workers)` chunks each. The last slice may be
/// shorter. Returns fewer than `workers` slices if `chunk_count < workers`.
pub fn split_chunks(chunk_count: usize, workers: usize) -> Vec<WorkSplit> {
    if chunk_count == 0 || workers == 0 {
        return Vec::new();
    }
    let cpw = ceil_div(chunk_count, workers);
    let mut out = Vec::new();
    let mut start = 0;
    while start < chunk_count {
        let end = (start + cpw).min(chunk_count);
        out.push(WorkSplit { start, end });
        start = end;
    }
    out
}

/// Map over each item and collect results in order, possibly in parallel.
/// Used by the builder for both per-worker chunk summarization (over
/// `WorkSplit`s) and per-level internal-node fill (over node indices).
pub fn par_map<T, F, R>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    F: Fn(&T) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        items.par_iter().map(|w| f(w)).collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        items.iter().map(|w| f(w)).collect()
    }
}
