//! Chunk summarizer (C3): excess/min/max/min-count over a bit range.

use crate::bitvec::BitSeq;

/// Result of summarizing `[lo, hi)` of `bits`, starting from excess `e0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub excess_at_hi: i32,
    pub min: i32,
    pub max: i32,
    pub min_count: u32,
}

/// Walk `bits[lo..hi)`, tracking excess starting from `e0`.
///
/// `e0` is the excess just *before* `lo` (a position outside this range); it
/// seeds the running total but is never itself a candidate for `min`/`max`/
/// `min_count`, which only consider excess values attained at positions
/// inside `[lo, hi)`.
///
/// `lo < hi` is required: a summary is only meaningful over a non-empty range.
pub fn summarize(bits: &BitSeq, lo: usize, hi: usize, e0: i32) -> Summary {
    assert!(lo < hi, "summarize: empty range [{lo}, {hi})");

    let mut partial_excess = e0;
    let mut min = i32::MAX;
    let mut max = i32::MIN;
    let mut min_count = 0u32;

    for i in lo..hi {
        partial_excess += if bits.get_bit(i) { 1 } else { -1 };

        if partial_excess < min {
            min = partial_excess;
            min_count = 1;
        } else if partial_excess == min {
            min_count += 1;
        }
        if partial_excess > max {
            max = partial_excess;
        }
    }

    Summary { excess_at_hi: partial_excess, min, max, min_count }
}
