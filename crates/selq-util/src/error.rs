//! Core error types for the selq-util crate.
//!
//! A selector parse fails fast: the queue and the parser never recover
//! once a production errors out, so there is exactly one error in flight
//! at a time. `SelectorErrorKind` enumerates the distinct internal reasons
//! a parse can fail; `SelectorParseError` is the single type that actually
//! crosses a crate boundary, carrying the original query and the queue
//! position the failure was detected at.

use thiserror::Error;

/// The internal reason a selector failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorErrorKind {
    /// `find_elements` found no production matching the head of the queue.
    #[error("unexpected token at '{0}'")]
    UnexpectedToken(String),

    /// An id, class, subquery, or regex argument was empty where one was required.
    #[error("{0} must not be empty")]
    EmptyRequiredToken(&'static str),

    /// `chomp_balanced` ran out of input before `depth` returned to zero.
    #[error("unbalanced '{open}' / '{close}'")]
    UnbalancedDelimiter { open: char, close: char },

    /// `TokenQueue::consume(seq)` was called but the queue did not match `seq`.
    #[error("expected '{expected}' but it did not match the queue")]
    QueueMismatch { expected: String },

    /// `:lt()`, `:gt()`, `:eq()` argument was not all-digits.
    #[error("index must be numeric, got '{0}'")]
    BadIndex(String),

    /// An `nth-*` argument matched none of `odd`, `even`, `AnB`, or `B`.
    #[error("could not parse nth-expression '{0}'")]
    BadNthFormula(String),

    /// Defensive: a combinator fold was reached with an unrecognized combinator
    /// character. Unreachable from normal dispatch.
    #[error("unknown combinator '{0}'")]
    UnknownCombinator(char),

    /// A `:matches()`/`:matchesOwn()`/attribute-regex pattern failed to compile.
    #[error("could not compile regex: {0}")]
    RegexCompile(String),
}

/// The single error type that crosses the `selq` public API boundary.
///
/// Carries the original query string and the byte offset into it where the
/// queue stood when the failure was raised, so embedders can point a user
/// at the offending character without re-deriving it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not parse selector '{query}': {kind}")]
pub struct SelectorParseError {
    pub kind: SelectorErrorKind,
    pub query: String,
    pub at: usize,
}

impl SelectorParseError {
    pub fn new(kind: SelectorErrorKind, query: impl Into<String>, at: usize) -> Self {
        Self {
            kind,
            query: query.into(),
            at,
        }
    }
}

/// Result type alias used throughout the selq workspace.
pub type SelectorResult<T> = std::result::Result<T, SelectorParseError>;
