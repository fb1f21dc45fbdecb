//! selq-queue — `TokenQueue`, a position-indexed cursor over a selector
//! string.
//!
//! It owns the one piece of mutable scanning state a parse needs, and
//! exposes lexing primitives (lookahead, prefix matching, balanced-
//! delimiter extraction) for the layer above it to build productions
//! out of. It carries no selector grammar of its own — that lives in
//! `selq-core`.

pub mod chars;
mod queue;

pub use queue::{unescape, TokenQueue, EOF};
