//! Error types for bp_rmm.
//!
//! Construction failures are reported via `BpError`. Query failures (a
//! `fwd_search`/`find_close` that finds no match) are not errors in this
//! crate's sense — they return `None`, since a failed query is an expected,
//! non-exceptional outcome for malformed or boundary input.

use thiserror::Error;

/// Errors returned by [`crate::Index::create`] and related construction paths.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BpError {
    /// `n <= s`: the input is too small to own at least one full chunk per worker.
    #[error("input too small: n={n} must exceed the chunk size s={s}")]
    InputTooSmall { n: usize, s: usize },

    /// Optional debug-mode check: excess went negative, or final excess != 0.
    #[error("malformed balanced-parentheses input at bit {at}: excess invariant violated")]
    MalformedBp { at: usize },

    /// `BitSeq::from_bp_str` rejected a character while parsing `Index::create`'s input.
    #[error(transparent)]
    InvalidInput(#[from] ParseError),
}

/// Errors returned by [`crate::bitvec::BitSeq::from_bp_str`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid character {found:?} at position {at}: expected '(' or ')'")]
    InvalidParenChar { at: usize, found: char },
}

pub type BpResult<T> = Result<T, BpError>;
