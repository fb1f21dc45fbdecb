//! `Evaluator` — the immutable predicate tree [`crate::parser::parse`] builds.
//!
//! The hierarchy is a closed sum type with three super-categories: leaf
//! predicates, index predicates, structural wrappers that embed one inner
//! evaluator, and combining evaluators (`And`/`Or`) that own a vector of
//! children. Nothing here can fail except the `*matching`/`matches*`
//! constructors, which compile a [`regex::Regex`] and surface a compile
//! error to the caller rather than panicking.

use regex::Regex;
use selq_util::SelectorErrorKind;
use std::sync::Arc;

/// Result type for the handful of evaluator constructors that compile a
/// regex. Kept as a bare [`SelectorErrorKind`] rather than the full
/// [`selq_util::SelectorParseError`] — these constructors have no query
/// string or queue position to attach; the parser attaches both via
/// [`selq_queue::TokenQueue::error`] when it propagates the failure.
pub type EvalResult<T> = Result<T, SelectorErrorKind>;

/// A compiled regex wrapper so [`Evaluator`] can derive `Clone`/`Debug`
/// and implement `PartialEq` by comparing pattern source text — `Regex`
/// itself is `Clone + Debug` but not `PartialEq`.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Arc<Regex>,
}

impl CompiledPattern {
    fn compile(pattern: &str) -> EvalResult<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| SelectorErrorKind::RegexCompile(e.to_string()))?;
        Ok(Self {
            source: pattern.to_string(),
            regex: Arc::new(regex),
        })
    }

    /// The original pattern text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The compiled regex, for embedders that go on to match documents.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// An immutable predicate over document-tree nodes, optionally combined
/// with structural context. Built exclusively through the constructor
/// functions below and the combinator folds in [`crate::parser`]; once a
/// parse returns, the tree is never mutated again (the one exception,
/// [`Evaluator::right_most`]/[`Evaluator::replace_right_most`], is
/// `pub(crate)` parser-internal plumbing — see "Combinator folding" in
/// the parser module docs).
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluator {
    // -- leaf predicates -------------------------------------------------
    Tag(String),
    TagEndsWith(String),
    Id(String),
    Class(String),
    AllElements,
    Attribute(String),
    AttributeStarting(String),
    AttributeWithValue(String, String),
    AttributeWithValueNot(String, String),
    AttributeWithValueStarting(String, String),
    AttributeWithValueEnding(String, String),
    AttributeWithValueContaining(String, String),
    AttributeWithValueMatching(String, CompiledPattern),
    ContainsText(String),
    ContainsOwnText(String),
    ContainsData(String),
    Matches(CompiledPattern),
    MatchesOwn(CompiledPattern),
    MatchText,

    // -- index predicates --------------------------------------------------
    IndexLessThan(i64),
    IndexGreaterThan(i64),
    IndexEquals(i64),
    IsNthChild(i32, i32),
    IsNthLastChild(i32, i32),
    IsNthOfType(i32, i32),
    IsNthLastOfType(i32, i32),
    IsFirstChild,
    IsLastChild,
    IsFirstOfType,
    IsLastOfType,
    IsOnlyChild,
    IsOnlyOfType,
    IsEmpty,
    IsRoot,

    // -- structural wrappers: each embeds exactly one inner evaluator ----
    Root,
    Parent(Box<Evaluator>),
    ImmediateParent(Box<Evaluator>),
    PreviousSibling(Box<Evaluator>),
    ImmediatePreviousSibling(Box<Evaluator>),
    Has(Box<Evaluator>),
    Not(Box<Evaluator>),

    // -- combining evaluators ---------------------------------------------
    And(Vec<Evaluator>),
    Or(Vec<Evaluator>),
}

impl Evaluator {
    pub fn tag(name: impl Into<String>) -> Self {
        Evaluator::Tag(name.into())
    }

    pub fn tag_ends_with(suffix: impl Into<String>) -> Self {
        Evaluator::TagEndsWith(suffix.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Evaluator::Id(id.into())
    }

    pub fn class(name: impl Into<String>) -> Self {
        Evaluator::Class(name.into())
    }

    pub fn all_elements() -> Self {
        Evaluator::AllElements
    }

    pub fn attribute(key: impl Into<String>) -> Self {
        Evaluator::Attribute(key.into())
    }

    pub fn attribute_starting(prefix: impl Into<String>) -> Self {
        Evaluator::AttributeStarting(prefix.into())
    }

    pub fn attribute_with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Evaluator::AttributeWithValue(key.into(), value.into())
    }

    pub fn attribute_with_value_not(key: impl Into<String>, value: impl Into<String>) -> Self {
        Evaluator::AttributeWithValueNot(key.into(), value.into())
    }

    pub fn attribute_with_value_starting(key: impl Into<String>, value: impl Into<String>) -> Self {
        Evaluator::AttributeWithValueStarting(key.into(), value.into())
    }

    pub fn attribute_with_value_ending(key: impl Into<String>, value: impl Into<String>) -> Self {
        Evaluator::AttributeWithValueEnding(key.into(), value.into())
    }

    pub fn attribute_with_value_containing(key: impl Into<String>, value: impl Into<String>) -> Self {
        Evaluator::AttributeWithValueContaining(key.into(), value.into())
    }

    pub fn attribute_with_value_matching(
        key: impl Into<String>,
        pattern: &str,
    ) -> EvalResult<Self> {
        Ok(Evaluator::AttributeWithValueMatching(
            key.into(),
            CompiledPattern::compile(pattern)?,
        ))
    }

    pub fn contains_text(s: impl Into<String>) -> Self {
        Evaluator::ContainsText(s.into())
    }

    pub fn contains_own_text(s: impl Into<String>) -> Self {
        Evaluator::ContainsOwnText(s.into())
    }

    pub fn contains_data(s: impl Into<String>) -> Self {
        Evaluator::ContainsData(s.into())
    }

    pub fn matches(pattern: &str) -> EvalResult<Self> {
        Ok(Evaluator::Matches(CompiledPattern::compile(pattern)?))
    }

    pub fn matches_own(pattern: &str) -> EvalResult<Self> {
        Ok(Evaluator::MatchesOwn(CompiledPattern::compile(pattern)?))
    }

    pub fn match_text() -> Self {
        Evaluator::MatchText
    }

    pub fn index_less_than(n: i64) -> Self {
        Evaluator::IndexLessThan(n)
    }

    pub fn index_greater_than(n: i64) -> Self {
        Evaluator::IndexGreaterThan(n)
    }

    pub fn index_equals(n: i64) -> Self {
        Evaluator::IndexEquals(n)
    }

    pub fn is_nth_child(a: i32, b: i32) -> Self {
        Evaluator::IsNthChild(a, b)
    }

    pub fn is_nth_last_child(a: i32, b: i32) -> Self {
        Evaluator::IsNthLastChild(a, b)
    }

    pub fn is_nth_of_type(a: i32, b: i32) -> Self {
        Evaluator::IsNthOfType(a, b)
    }

    pub fn is_nth_last_of_type(a: i32, b: i32) -> Self {
        Evaluator::IsNthLastOfType(a, b)
    }

    pub fn is_first_child() -> Self {
        Evaluator::IsFirstChild
    }

    pub fn is_last_child() -> Self {
        Evaluator::IsLastChild
    }

    pub fn is_first_of_type() -> Self {
        Evaluator::IsFirstOfType
    }

    pub fn is_last_of_type() -> Self {
        Evaluator::IsLastOfType
    }

    pub fn is_only_child() -> Self {
        Evaluator::IsOnlyChild
    }

    pub fn is_only_of_type() -> Self {
        Evaluator::IsOnlyOfType
    }

    pub fn is_empty() -> Self {
        Evaluator::IsEmpty
    }

    pub fn is_root() -> Self {
        Evaluator::IsRoot
    }

    pub fn root() -> Self {
        Evaluator::Root
    }

    pub fn parent(inner: Evaluator) -> Self {
        Evaluator::Parent(Box::new(inner))
    }

    pub fn immediate_parent(inner: Evaluator) -> Self {
        Evaluator::ImmediateParent(Box::new(inner))
    }

    pub fn previous_sibling(inner: Evaluator) -> Self {
        Evaluator::PreviousSibling(Box::new(inner))
    }

    pub fn immediate_previous_sibling(inner: Evaluator) -> Self {
        Evaluator::ImmediatePreviousSibling(Box::new(inner))
    }

    pub fn has(inner: Evaluator) -> Self {
        Evaluator::Has(Box::new(inner))
    }

    pub fn not(inner: Evaluator) -> Self {
        Evaluator::Not(Box::new(inner))
    }

    /// Builds an `And` of `children`. Never collapses a single child to
    /// itself — that collapse is the parser driver's job, not the
    /// constructor's.
    pub fn and(children: Vec<Evaluator>) -> Self {
        Evaluator::And(children)
    }

    /// Builds an `Or` out of two evaluators. Parser-internal folds grow
    /// it further via [`Self::or_append`]; by the time an `Or` is
    /// surfaced outside the parser's working list it always has at least
    /// two children.
    pub fn or(first: Evaluator, second: Evaluator) -> Self {
        Evaluator::Or(vec![first, second])
    }

    /// Appends `next` to an existing `Or`'s children. Panics if `self`
    /// is not an `Or` — parser-internal, called only from
    /// [`crate::parser`]'s combinator fold after checking the variant.
    pub(crate) fn or_append(&mut self, next: Evaluator) {
        match self {
            Evaluator::Or(children) => children.push(next),
            _ => panic!("or_append called on a non-Or evaluator"),
        }
    }

    /// The last child of an `Or`, for the OR-rightmost-replacement trick
    /// a combinator fold uses to keep OR the lowest-precedence operator.
    /// Panics if `self` is not an `Or` or has no children.
    pub(crate) fn right_most(&self) -> Evaluator {
        match self {
            Evaluator::Or(children) => children
                .last()
                .cloned()
                .expect("Or must have at least one child"),
            _ => panic!("right_most called on a non-Or evaluator"),
        }
    }

    /// Replaces the last child of an `Or` with `replacement`. Panics if
    /// `self` is not an `Or` or has no children.
    pub(crate) fn replace_right_most(&mut self, replacement: Evaluator) {
        match self {
            Evaluator::Or(children) => {
                let last = children
                    .last_mut()
                    .expect("Or must have at least one child");
                *last = replacement;
            }
            _ => panic!("replace_right_most called on a non-Or evaluator"),
        }
    }

    /// True iff `self` is an `Or`.
    pub(crate) fn is_or(&self) -> bool {
        matches!(self, Evaluator::Or(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_append_grows_children() {
        let mut e = Evaluator::or(Evaluator::tag("a"), Evaluator::tag("b"));
        e.or_append(Evaluator::tag("c"));
        match &e {
            Evaluator::Or(children) => assert_eq!(children.len(), 3),
            _ => panic!("expected Or"),
        }
    }

    #[test]
    fn right_most_and_replace_round_trip() {
        let mut e = Evaluator::or(Evaluator::tag("a"), Evaluator::tag("b"));
        assert_eq!(e.right_most(), Evaluator::tag("b"));
        e.replace_right_most(Evaluator::tag("z"));
        assert_eq!(e.right_most(), Evaluator::tag("z"));
    }

    #[test]
    #[should_panic]
    fn right_most_panics_on_non_or() {
        Evaluator::tag("a").right_most();
    }

    #[test]
    fn compiled_pattern_eq_compares_source_text() {
        let a = CompiledPattern::compile("a.*b").unwrap();
        let b = CompiledPattern::compile("a.*b").unwrap();
        let c = CompiledPattern::compile("different").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn compiled_pattern_bad_regex_errors() {
        let err = CompiledPattern::compile("(unclosed").unwrap_err();
        assert!(matches!(err, SelectorErrorKind::RegexCompile(_)));
    }
}
