//! Character classification used by [`crate::TokenQueue`]'s lexing primitives.
//!
//! Each predicate corresponds to one character class the `TokenQueue`
//! lexing contract names (whitespace, letter-or-digit "words", tag-name
//! characters, CSS identifier characters, attribute-key characters).
//! Kept as free functions rather than methods on a type, so `queue.rs`
//! can compose them without an extra type.

/// Space, tab, CR, LF, or FF — the whitespace set `matches_whitespace`/
/// `consume_whitespace` use (deliberately narrower than
/// [`char::is_whitespace`], which also accepts e.g. non-breaking space
/// and vertical tab).
#[inline]
pub fn is_selector_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0C')
}

/// Unicode letter-or-digit, for `matches_word`/`consume_word`.
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// `consume_tag_name`: letter, digit, `:`, `_`, or `-`.
#[inline]
pub fn is_tag_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ':' | '_' | '-')
}

/// `consume_element_selector`: letter, digit, `_`, or `-` (the `*|`/`|`
/// namespace markers are handled separately by the queue, not by this
/// predicate).
#[inline]
pub fn is_element_selector_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-')
}

/// `consume_css_identifier`: letter, digit, `-`, or `_`.
#[inline]
pub fn is_css_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_')
}

/// `consume_attribute_key`: letter, digit, `-`, `_`, or `:`.
#[inline]
pub fn is_attribute_key_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ':')
}
