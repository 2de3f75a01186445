//! bp_rmm — parallel construction and forward-search queries over a
//! balanced-parentheses succinct tree, backed by a range min-max tree.
//!
//! Features:
//! - `rayon` : parallel construction and internal-node fill (on by default;
//!             a sequential fallback is always compiled in)
//!
//! The public surface is small: build an [`Index`] from a bit sequence with
//! [`build::build`], then query it with [`Index::find_close`] and
//! [`Index::fwd_search`].

#![forbid(unsafe_op_in_unsafe_fn)]
#![deny(rust_2018_idioms, unused_must_use)]

pub mod bitvec;
pub mod build;
pub mod engine;
pub mod error;
pub mod parallel;
pub mod pool;
pub mod rmm;
pub mod summary;
pub mod tables;

pub use bitvec::BitSeq;
pub use error::{BpError, BpResult, ParseError};
pub use pool::PoolConfig;
pub use rmm::Index;

impl Index {
    /// Parse `bp` as a `(`/`)` string and build its RMM-tree index, using the
    /// worker count resolved from `cfg`.
    pub fn create(bp: &str, cfg: &PoolConfig) -> BpResult<Index> {
        let bits = BitSeq::from_bp_str(bp)?;
        build::build(&bits, cfg)
    }

    /// Like [`Index::create`], but also validates the excess invariant
    /// (excess never negative, final excess zero) and reports a violation as
    /// `BpError::MalformedBp` instead of only `debug_assert!`-ing it away in
    /// release builds.
    pub fn create_checked(bp: &str, cfg: &PoolConfig) -> BpResult<Index> {
        let bits = BitSeq::from_bp_str(bp)?;
        build::check_balanced(&bits)?;
        build::build(&bits, cfg)
    }
}
