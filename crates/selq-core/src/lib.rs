//! selq-core — the `Evaluator` data model and the `QueryParser` that
//! builds it from a CSS-selector-shaped query string.
//!
//! A set of recursive-descent production functions dispatching off a
//! cursor ([`selq_queue::TokenQueue`]) into an immutable predicate tree
//! ([`Evaluator`]). It depends on `selq-queue` for lexing and `selq-util`
//! for the shared error type and string normalization; it introduces no
//! dependency of its own beyond `regex` (to compile `:matches()`/
//! `[attr~=]` patterns) and `tracing` (to instrument the parse).
//!
//! # Example
//!
//! ```
//! use selq_core::{parse_selector, Evaluator};
//!
//! let tree = parse_selector("div.main > a[href^=\"/\"]").unwrap();
//! assert_eq!(
//!     tree,
//!     Evaluator::and(vec![
//!         Evaluator::and(vec![
//!             Evaluator::tag("a"),
//!             Evaluator::attribute_with_value_starting("href", "\"/\""),
//!         ]),
//!         Evaluator::immediate_parent(Evaluator::and(vec![
//!             Evaluator::tag("div"),
//!             Evaluator::class("main"),
//!         ])),
//!     ])
//! );
//! ```
//!
//! Only one entry point is public: [`parse_selector`]. [`unescape`] and
//! [`TokenQueue`] are re-exported too, since an embedder may want the
//! scanning primitives directly, not because this crate uses them as
//! anything more than plumbing.

mod edge_cases;
pub mod evaluator;
mod nth;
mod parser;

pub use evaluator::{CompiledPattern, EvalResult, Evaluator};
pub use selq_queue::{unescape, TokenQueue};
pub use selq_util::{SelectorErrorKind, SelectorParseError, SelectorResult};

/// Parses a CSS-selector-shaped query string into a single evaluator
/// tree. Deliberately scoped to parsing alone: no document walking, no
/// serialization, and no caching of the result — those are left to
/// whatever collaborator evaluates the tree against a document.
pub fn parse_selector(css_query: &str) -> SelectorResult<Evaluator> {
    parser::parse(css_query)
}
