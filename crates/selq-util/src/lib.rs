//! selq-util — shared error types and string normalization.
//!
//! A small, dependency-light foundation that the phase crates above it
//! (`selq-queue`, `selq-core`) both sit on top of. It carries no parsing
//! logic of its own.

pub mod error;
pub mod normalize;

pub use error::{SelectorErrorKind, SelectorParseError, SelectorResult};
pub use normalize::normalize;
