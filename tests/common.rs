//! Test helpers and deterministic random data for `bp_rmm`.
//!
//! This module is shared by multiple `tests/*.rs` files. It provides:
//! - A tiny, dependency-free PRNG (XorShift64) with deterministic seeding
//! - A generator for random well-formed balanced-parentheses sequences
//! - A naive (`O(n)` worst case) reference `find_close`/summarizer for
//!   cross-checking the RMM-tree implementation
//! - Small assertion utilities with compact hex previews
//!
//! Usage in tests:
//! ```ignore
//! mod common;
//! use common::*;
//!
//! #[test]
//! fn my_test() {
//!     let mut rng = rng_from_env(); // honors TEST_SEED if set
//!     let bp = random_balanced_parens(4096, &mut rng);
//! }
//! ```

use std::env;

#[allow(dead_code)]
pub const DEFAULT_TEST_SEED: u64 = 0xA11C_1A9E_C0FF_EE42;

/// Minimal, fast, deterministic PRNG (XorShift64).
/// Not cryptographically secure—only for tests/benches.
#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    #[inline]
    pub fn new(seed: u64) -> Self {
        // Avoid the all-zero lockup state.
        let s = if seed == 0 { DEFAULT_TEST_SEED } else { seed };
        Self { state: s }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        // Marsaglia Xorshift64*
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() & 0xFFFF_FFFF) as u32
    }
}

/// Seed from env (`TEST_SEED`), or fallback to DEFAULT_TEST_SEED.
/// Accepts decimal or `0x` hex values.
#[allow(dead_code)]
pub fn seed_from_env() -> u64 {
    if let Ok(s) = env::var("TEST_SEED") {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16).unwrap_or(DEFAULT_TEST_SEED)
        } else {
            s.parse::<u64>().unwrap_or(DEFAULT_TEST_SEED)
        }
    } else {
        DEFAULT_TEST_SEED
    }
}

/// Convenience: construct an RNG from `TEST_SEED` (or default).
#[allow(dead_code)]
pub fn rng_from_env() -> XorShift64 {
    XorShift64::new(seed_from_env())
}

/// Generate a random well-formed balanced-parentheses string of length `n`
/// (`n` must be even). Uses a reflection-style walk: at each step, pick `(`
/// or `)` uniformly among choices that keep the remaining suffix completable
/// (depth stays `>= 0` and can still reach `0` by the end).
#[allow(dead_code)]
pub fn random_balanced_parens(n: usize, rng: &mut XorShift64) -> String {
    assert_eq!(n % 2, 0, "random_balanced_parens: n must be even");
    let mut s = String::with_capacity(n);
    let mut depth = 0i64;
    for i in 0..n {
        let remaining = (n - i) as i64;
        let can_open = depth + 1 <= remaining - 1;
        let can_close = depth > 0;
        let open = if can_open && can_close {
            rng.next_u64() % 2 == 0
        } else {
            can_open
        };
        if open {
            s.push('(');
            depth += 1;
        } else {
            s.push(')');
            depth -= 1;
        }
    }
    debug_assert_eq!(depth, 0);
    s
}

/// Reference `find_close`: the naive `O(n)` stack-free scan, used to
/// cross-check the RMM-tree's `find_close`.
#[allow(dead_code)]
pub fn naive_find_close(bp: &str, i: usize) -> Option<usize> {
    let bytes = bp.as_bytes();
    if i >= bytes.len() || bytes[i] != b'(' {
        return None;
    }
    let mut depth = 0i64;
    for (j, &b) in bytes.iter().enumerate().skip(i) {
        depth += if b == b'(' { 1 } else { -1 };
        if depth == 0 {
            return Some(j);
        }
    }
    None
}

/// Reference chunk summary: excess at the end of `[lo, hi)` (inclusive
/// convention, seeded at `e0`), plus the min/max/min-count over the range.
/// `e0` is the excess just before `lo`, outside the range, and is never
/// itself a candidate for min/max/min_count.
#[allow(dead_code)]
pub fn naive_summary(bp: &str, lo: usize, hi: usize, e0: i32) -> (i32, i32, i32, u32) {
    let bytes = bp.as_bytes();
    let mut excess = e0;
    let mut min = i32::MAX;
    let mut max = i32::MIN;
    let mut min_count = 0u32;
    for &b in &bytes[lo..hi] {
        excess += if b == b'(' { 1 } else { -1 };
        if excess < min {
            min = excess;
            min_count = 1;
        } else if excess == min {
            min_count += 1;
        }
        if excess > max {
            max = excess;
        }
    }
    (excess, min, max, min_count)
}

/// Small hex encoder for debug/assert messages.
#[allow(dead_code)]
pub fn to_hex(data: &[u8]) -> String {
    const LUT: &[u8; 16] = b"0123456789abcdef";
    let mut s = String::with_capacity(data.len() * 2);
    for &b in data {
        s.push(LUT[(b >> 4) as usize] as char);
        s.push(LUT[(b & 0x0f) as usize] as char);
    }
    s
}

/// Truncate a byte slice for display, showing head/tail with ellipsis.
#[allow(dead_code)]
pub fn preview_bytes(data: &[u8], max: usize) -> String {
    if data.len() <= max {
        return to_hex(data);
    }
    let head = max / 2;
    let tail = max - head;
    format!("{}…{}", to_hex(&data[..head]), to_hex(&data[data.len() - tail..]))
}

/// Assert two byte slices equal with concise hex diff previews.
#[allow(dead_code)]
pub fn assert_eq_bytes(a: &[u8], b: &[u8]) {
    if a != b {
        let max = 64; // chars of hex to show
        panic!(
            "byte mismatch:\n  left (len={}):  {}\n  right(len={}):  {}",
            a.len(),
            preview_bytes(a, max),
            b.len(),
            preview_bytes(b, max)
        );
    }
}

#[cfg(test)]
mod selfcheck {
    use super::*;

    #[test]
    fn xorshift_basic() {
        let mut r = XorShift64::new(1);
        let a = r.next_u64();
        let b = r.next_u64();
        assert_ne!(a, b);
    }

    #[test]
    fn random_balanced_parens_is_well_formed() {
        let mut rng = XorShift64::new(7);
        for _ in 0..20 {
            let s = random_balanced_parens(512, &mut rng);
            let mut depth = 0i64;
            for b in s.bytes() {
                depth += if b == b'(' { 1 } else { -1 };
                assert!(depth >= 0, "depth went negative in {s}");
            }
            assert_eq!(depth, 0);
        }
    }

    #[test]
    fn naive_find_close_matches_hand_example() {
        let s = "((()))(())";
        assert_eq!(naive_find_close(s, 0), Some(5));
        assert_eq!(naive_find_close(s, 6), Some(9));
        assert_eq!(naive_find_close(s, 1), Some(4));
    }
}
