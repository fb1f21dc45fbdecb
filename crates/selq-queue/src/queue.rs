//! `TokenQueue` — a position-indexed cursor over a selector string.
//!
//! This is the single state a parse owns exclusively: a backing buffer
//! and a byte offset into it, `0 <= pos <= buffer.len()`. Every mutating
//! operation except [`TokenQueue::add_first`] only ever advances `pos`;
//! `add_first` is the one operation that rewrites the buffer itself, and
//! is rare enough in practice that it is allowed to copy.
//!
//! # Example
//!
//! ```
//! use selq_queue::TokenQueue;
//!
//! let mut queue = TokenQueue::new("div.main");
//! assert_eq!(queue.consume_tag_name(), "div");
//! assert!(queue.match_chomp("."));
//! assert_eq!(queue.consume_css_identifier(), "main");
//! assert!(queue.is_empty());
//! ```

use crate::chars;
use selq_util::{SelectorErrorKind, SelectorParseError, SelectorResult};

/// NUL sentinel returned by [`TokenQueue::peek`]/[`TokenQueue::consume`]
/// at end of input.
pub const EOF: char = '\0';

/// A cursor over a selector string, offering the lexing primitives a
/// recursive-descent parser needs: lookahead, case-sensitive/insensitive
/// matching, and quote/escape-aware balanced-bracket extraction.
///
/// Exclusively owned: nothing here is `Sync`, and nothing needs to be —
/// one `TokenQueue` belongs to exactly one in-progress parse.
#[derive(Debug, Clone)]
pub struct TokenQueue {
    buffer: String,
    pos: usize,
}

impl TokenQueue {
    /// Creates a queue positioned at the start of `input`.
    pub fn new(input: &str) -> Self {
        Self {
            buffer: input.to_string(),
            pos: 0,
        }
    }

    /// The full backing buffer (not just the unconsumed remainder).
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current byte offset into the buffer.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Builds a [`SelectorParseError`] anchored at this queue's current
    /// buffer and position. Used both internally (`QueueMismatch`,
    /// `UnbalancedDelimiter`) and by callers building their own errors
    /// (`UnexpectedToken`, `BadIndex`, ...).
    pub fn error(&self, kind: SelectorErrorKind) -> SelectorParseError {
        SelectorParseError::new(kind, self.buffer.clone(), self.pos)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// True iff the cursor has consumed the entire buffer.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buffer.len()
    }

    /// The code point at the cursor, or [`EOF`] if empty. Never advances.
    #[inline]
    pub fn peek(&self) -> char {
        self.buffer[self.pos..].chars().next().unwrap_or(EOF)
    }

    /// Case-insensitive prefix match at the cursor. Does not advance.
    pub fn matches(&self, seq: &str) -> bool {
        ci_starts_with(&self.buffer[self.pos..], seq)
    }

    /// Case-sensitive prefix match at the cursor. Does not advance.
    pub fn matches_cs(&self, seq: &str) -> bool {
        self.buffer[self.pos..].starts_with(seq)
    }

    /// True iff [`Self::matches`] holds for any of `seqs`.
    pub fn matches_any(&self, seqs: &[&str]) -> bool {
        seqs.iter().any(|s| self.matches(s))
    }

    /// True iff the queue is non-empty and its head character is one of `chars`.
    pub fn matches_any_char(&self, chars: &[char]) -> bool {
        !self.is_empty() && chars.contains(&self.peek())
    }

    /// True iff the remaining input looks like the start of an HTML tag:
    /// at least two characters remain, the first is `<`, the second is a
    /// letter.
    pub fn matches_start_tag(&self) -> bool {
        let mut rest = self.buffer[self.pos..].chars();
        match (rest.next(), rest.next()) {
            (Some('<'), Some(c)) => c.is_alphabetic(),
            _ => false,
        }
    }

    /// True iff non-empty and the head character is selector whitespace
    /// (space, tab, CR, LF, FF).
    pub fn matches_whitespace(&self) -> bool {
        !self.is_empty() && chars::is_selector_whitespace(self.peek())
    }

    /// True iff non-empty and the head character is a Unicode letter or digit.
    pub fn matches_word(&self) -> bool {
        !self.is_empty() && chars::is_word_char(self.peek())
    }

    // ------------------------------------------------------------------
    // Mutating primitives
    // ------------------------------------------------------------------

    /// Advances past one code point. A no-op at end of input.
    #[inline]
    pub fn advance(&mut self) {
        if let Some(c) = self.buffer[self.pos..].chars().next() {
            self.pos += c.len_utf8();
        }
    }

    /// Returns the code point at the cursor and advances past it.
    ///
    /// Returns [`EOF`] without moving the cursor if already empty —
    /// callers are expected to have checked [`Self::is_empty`] first;
    /// this is the safe fallback for that contract, not a new guarantee.
    pub fn consume(&mut self) -> char {
        let c = self.peek();
        self.advance();
        c
    }

    /// Consumes `seq` if it matches (case-insensitively) at the cursor.
    ///
    /// Fails with [`SelectorErrorKind::QueueMismatch`] if it does not, or
    /// if fewer than `seq.len()` bytes remain.
    pub fn consume_str(&mut self, seq: &str) -> SelectorResult<()> {
        if self.buffer.len() - self.pos < seq.len() || !self.matches(seq) {
            return Err(self.error(SelectorErrorKind::QueueMismatch {
                expected: seq.to_string(),
            }));
        }
        self.pos += seq.len();
        Ok(())
    }

    /// If [`Self::matches`] holds, advances past `seq` and returns `true`;
    /// otherwise leaves the cursor untouched and returns `false`.
    pub fn match_chomp(&mut self, seq: &str) -> bool {
        if self.matches(seq) {
            self.pos += seq.len();
            true
        } else {
            false
        }
    }

    /// Advances through a maximal run of selector whitespace. Returns
    /// whether at least one character was consumed.
    pub fn consume_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.matches_whitespace() {
            self.advance();
        }
        self.pos != start
    }

    /// Advances through a maximal run of letter-or-digit characters.
    pub fn consume_word(&mut self) -> String {
        self.consume_while(chars::is_word_char)
    }

    /// Advances through a maximal run of `consume_tag_name` characters
    /// (letter, digit, `:`, `_`, `-`).
    pub fn consume_tag_name(&mut self) -> String {
        self.consume_while(chars::is_tag_name_char)
    }

    /// Advances through a maximal run of element-selector characters
    /// (letter, digit, `_`, `-`), also consuming the literal two-character
    /// sequence `*|` or the single character `|` wherever they occur.
    pub fn consume_element_selector(&mut self) -> String {
        let start = self.pos;
        loop {
            if self.is_empty() {
                break;
            }
            if self.matches_cs("*|") {
                self.pos += 2;
                continue;
            }
            if self.matches_cs("|") {
                self.pos += 1;
                continue;
            }
            if chars::is_element_selector_char(self.peek()) {
                self.advance();
            } else {
                break;
            }
        }
        self.buffer[start..self.pos].to_string()
    }

    /// Advances through a maximal run of CSS-identifier characters
    /// (letter, digit, `-`, `_`).
    pub fn consume_css_identifier(&mut self) -> String {
        self.consume_while(chars::is_css_identifier_char)
    }

    /// Advances through a maximal run of attribute-key characters
    /// (letter, digit, `-`, `_`, `:`).
    pub fn consume_attribute_key(&mut self) -> String {
        self.consume_while(chars::is_attribute_key_char)
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while !self.is_empty() && pred(self.peek()) {
            self.advance();
        }
        self.buffer[start..self.pos].to_string()
    }

    /// Case-sensitive scan: advances to the first occurrence of `seq` at
    /// or after the cursor, returning everything skipped over. Does not
    /// consume `seq` itself. If `seq` never occurs, advances to the end
    /// and returns the rest of the buffer.
    pub fn consume_to(&mut self, seq: &str) -> String {
        self.scan_to(seq, false)
    }

    /// Case-insensitive variant of [`Self::consume_to`].
    ///
    /// Scans with a fast path keyed on whether the first code point of
    /// `seq` is "cased" (its lowercase differs from its uppercase): if so,
    /// it looks for either case of that code point before verifying a
    /// full case-insensitive match; otherwise it walks one code point at
    /// a time. ASCII behavior is exact; behavior at non-BMP code points
    /// is best-effort rather than full Unicode case folding.
    pub fn consume_to_ignore_case(&mut self, seq: &str) -> String {
        self.scan_to(seq, true)
    }

    fn scan_to(&mut self, seq: &str, ignore_case: bool) -> String {
        let start = self.pos;
        let remaining = &self.buffer[self.pos..];
        let found = if ignore_case {
            find_ci(remaining, seq)
        } else {
            remaining.find(seq)
        };
        self.pos = match found {
            Some(idx) => self.pos + idx,
            None => self.buffer.len(),
        };
        self.buffer[start..self.pos].to_string()
    }

    /// Case-insensitive scan: advances while non-empty and none of `seqs`
    /// matches at the cursor, returning everything skipped over. Leaves
    /// the matching terminator (if any) on the queue.
    pub fn consume_to_any(&mut self, seqs: &[&str]) -> String {
        let start = self.pos;
        while !self.is_empty() && !self.matches_any(seqs) {
            self.advance();
        }
        self.buffer[start..self.pos].to_string()
    }

    /// [`Self::consume_to`] followed by [`Self::match_chomp`]; returns the
    /// pre-terminator slice.
    pub fn chomp_to(&mut self, seq: &str) -> String {
        let data = self.consume_to(seq);
        self.match_chomp(seq);
        data
    }

    /// Case-insensitive variant of [`Self::chomp_to`].
    pub fn chomp_to_ignore_case(&mut self, seq: &str) -> String {
        let data = self.consume_to_ignore_case(seq);
        self.match_chomp(seq);
        data
    }

    /// Consumes and returns everything from the cursor to the end of the buffer.
    pub fn remainder(&mut self) -> String {
        let rest = self.buffer[self.pos..].to_string();
        self.pos = self.buffer.len();
        rest
    }

    /// Prepends `s` to the unconsumed remainder and resets the cursor to
    /// the start of the new buffer. A rare operation, not a hot path, so
    /// it is allowed to copy.
    pub fn add_first(&mut self, s: &str) {
        if s.is_empty() {
            self.pos = 0;
            return;
        }
        let mut next = String::with_capacity(s.len() + (self.buffer.len() - self.pos));
        next.push_str(s);
        next.push_str(&self.buffer[self.pos..]);
        self.buffer = next;
        self.pos = 0;
    }

    /// Extracts a substring whose outer `open`/`close` delimiters balance,
    /// honoring single/double quotes and backslash escapes.
    ///
    /// The cursor must be positioned so the next character is `open`
    /// (callers consume any surrounding keyword first — e.g. `:has` but
    /// not its `(` — so that this sees the delimiter it is balancing).
    ///
    /// Returns the content strictly between the outermost `open`/`close`
    /// (both excluded), with inner balanced pairs, quoted text, and
    /// escapes left verbatim. Fails with
    /// [`SelectorErrorKind::UnbalancedDelimiter`] if the queue is
    /// exhausted while still unbalanced.
    pub fn chomp_balanced(&mut self, open: char, close: char) -> SelectorResult<String> {
        let mut depth: i32 = 0;
        let mut start: Option<usize> = None;
        let mut end: Option<usize> = None;
        let mut last: char = EOF;
        let mut in_quote = false;

        loop {
            if self.is_empty() {
                if depth > 0 {
                    return Err(self.error(SelectorErrorKind::UnbalancedDelimiter { open, close }));
                }
                break;
            }

            let c = self.consume();
            if last != '\\' {
                if (c == '\'' || c == '"') && c != open {
                    in_quote = !in_quote;
                } else if in_quote {
                    // quoted: skip depth/end bookkeeping for this character
                } else if c == open {
                    depth += 1;
                    if start.is_none() {
                        start = Some(self.pos);
                    }
                } else if c == close {
                    depth -= 1;
                }
            }

            if depth > 0 && last != EOF {
                end = Some(self.pos);
            }
            last = c;

            if depth == 0 && start.is_some() {
                break;
            }
        }

        match (start, end) {
            (Some(s), Some(e)) if e >= s => Ok(self.buffer[s..e].to_string()),
            (Some(s), _) => Ok(self.buffer[s..s].to_string()),
            (None, _) => Ok(String::new()),
        }
    }

    /// Consumes and discards any leading whitespace, returning nothing.
    /// A thin convenience wrapper used by the driver loop.
    pub fn skip_whitespace(&mut self) {
        self.consume_whitespace();
    }
}

/// Collapses backslash-escapes in `s`: a lone `\` is removed, a `\\` pair
/// emits one `\`, everything else passes through unchanged.
///
/// Idempotent on its own output, and the identity function on any string
/// that contains no `\`.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last = EOF;
    for c in s.chars() {
        if c == '\\' {
            if last == '\\' {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        last = c;
    }
    out
}

fn ci_starts_with(haystack: &str, needle: &str) -> bool {
    let mut h = haystack.chars().flat_map(char::to_lowercase);
    let mut n = needle.chars().flat_map(char::to_lowercase);
    loop {
        match (h.next(), n.next()) {
            (_, None) => return true,
            (Some(a), Some(b)) if a == b => continue,
            _ => return false,
        }
    }
}

/// First-codepoint-cased fast path for case-insensitive substring search,
/// used by [`TokenQueue::consume_to_ignore_case`].
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let mut first = needle.chars();
    let n_first = match first.next() {
        Some(c) => c,
        None => return Some(0),
    };
    let cased = n_first.to_ascii_lowercase() != n_first.to_ascii_uppercase();
    let lower = n_first.to_ascii_lowercase();
    let upper = n_first.to_ascii_uppercase();

    let mut idx = 0;
    while idx < haystack.len() {
        let c = haystack[idx..].chars().next().unwrap();
        let candidate = if cased {
            c == lower || c == upper
        } else {
            c == n_first
        };
        if candidate && ci_starts_with(&haystack[idx..], needle) {
            return Some(idx);
        }
        idx += c.len_utf8();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use selq_util::SelectorErrorKind;

    #[test]
    fn peek_and_advance() {
        let mut q = TokenQueue::new("ab");
        assert_eq!(q.peek(), 'a');
        q.advance();
        assert_eq!(q.peek(), 'b');
        q.advance();
        assert!(q.is_empty());
        assert_eq!(q.peek(), EOF);
    }

    #[test]
    fn advance_is_idempotent_at_eof() {
        let mut q = TokenQueue::new("a");
        q.advance();
        assert!(q.is_empty());
        q.advance();
        assert!(q.is_empty());
        assert_eq!(q.pos(), 1);
    }

    #[test]
    fn matches_is_case_insensitive() {
        let q = TokenQueue::new("DIV.main");
        assert!(q.matches("div"));
        assert!(q.matches("DIV"));
        assert!(!q.matches_cs("div"));
        assert!(q.matches_cs("DIV"));
    }

    #[test]
    fn matches_any_and_any_char() {
        let q = TokenQueue::new(">foo");
        assert!(q.matches_any(&[",", ">", "+"]));
        assert!(q.matches_any_char(&[',', '>', '+', '~']));
        let empty = TokenQueue::new("");
        assert!(!empty.matches_any_char(&['a']));
    }

    #[test]
    fn matches_start_tag() {
        assert!(TokenQueue::new("<div>").matches_start_tag());
        assert!(!TokenQueue::new("< div>").matches_start_tag());
        assert!(!TokenQueue::new("<").matches_start_tag());
        assert!(!TokenQueue::new("foo").matches_start_tag());
    }

    #[test]
    fn consume_str_mismatch_errors() {
        let mut q = TokenQueue::new("abc");
        assert!(q.consume_str("ab").is_ok());
        let err = q.consume_str("zz").unwrap_err();
        assert_eq!(
            err.kind,
            SelectorErrorKind::QueueMismatch {
                expected: "zz".to_string()
            }
        );
    }

    #[test]
    fn consume_str_fails_when_too_short() {
        let mut q = TokenQueue::new("ab");
        assert!(q.consume_str("abcd").is_err());
    }

    #[test]
    fn match_chomp_advances_only_on_match() {
        let mut q = TokenQueue::new("div");
        assert!(!q.match_chomp("span"));
        assert_eq!(q.pos(), 0);
        assert!(q.match_chomp("DIV"));
        assert!(q.is_empty());
    }

    #[test]
    fn consume_whitespace_reports_whether_any_consumed() {
        let mut q = TokenQueue::new("   x");
        assert!(q.consume_whitespace());
        assert_eq!(q.peek(), 'x');
        assert!(!q.consume_whitespace());
    }

    #[test]
    fn consume_element_selector_handles_namespace_markers() {
        let mut q = TokenQueue::new("*|div rest");
        assert_eq!(q.consume_element_selector(), "*|div");
        assert_eq!(q.remainder(), " rest");

        let mut q2 = TokenQueue::new("ns|local.cls");
        assert_eq!(q2.consume_element_selector(), "ns|local");
    }

    #[test]
    fn consume_to_does_not_consume_terminator() {
        let mut q = TokenQueue::new("abc=def");
        assert_eq!(q.consume_to("="), "abc");
        assert_eq!(q.peek(), '=');
    }

    #[test]
    fn consume_to_missing_terminator_consumes_everything() {
        let mut q = TokenQueue::new("abcdef");
        assert_eq!(q.consume_to("="), "abcdef");
        assert!(q.is_empty());
    }

    #[test]
    fn consume_to_ignore_case_finds_any_case() {
        let mut q = TokenQueue::new("fooBARbaz");
        assert_eq!(q.consume_to_ignore_case("bar"), "foo");
        assert!(q.matches_cs("BARbaz"));
    }

    #[test]
    fn consume_to_any_leaves_terminator() {
        let mut q = TokenQueue::new("a.b>c");
        assert_eq!(q.consume_to_any(&[">", ".", "+", "~", ","]), "a");
        assert_eq!(q.peek(), '.');
    }

    #[test]
    fn chomp_to_consumes_terminator() {
        let mut q = TokenQueue::new("abc)rest");
        assert_eq!(q.chomp_to(")"), "abc");
        assert_eq!(q.remainder(), "rest");
    }

    #[test]
    fn remainder_consumes_to_end() {
        let mut q = TokenQueue::new("abcdef");
        q.advance();
        q.advance();
        assert_eq!(q.remainder(), "cdef");
        assert!(q.is_empty());
    }

    #[test]
    fn add_first_prepends_and_resets_position() {
        let mut q = TokenQueue::new("world");
        q.advance();
        q.advance();
        q.add_first("hello ");
        assert_eq!(q.pos(), 0);
        assert_eq!(q.buffer(), "hello rld");
    }

    #[test]
    fn chomp_balanced_nested_parens() {
        let mut q = TokenQueue::new("(one (two) three) four");
        assert_eq!(q.chomp_balanced('(', ')').unwrap(), "one (two) three");
        assert_eq!(q.remainder(), " four");
    }

    #[test]
    fn chomp_balanced_empty_parens() {
        let mut q = TokenQueue::new("()rest");
        assert_eq!(q.chomp_balanced('(', ')').unwrap(), "");
        assert_eq!(q.remainder(), "rest");
    }

    #[test]
    fn chomp_balanced_single_char() {
        let mut q = TokenQueue::new("(x)");
        assert_eq!(q.chomp_balanced('(', ')').unwrap(), "x");
    }

    #[test]
    fn chomp_balanced_respects_quotes() {
        // a close-bracket inside quotes should not end the balance early
        let mut q = TokenQueue::new(r#"[href="a)b"]"#);
        assert_eq!(q.chomp_balanced('[', ']').unwrap(), r#"href="a)b""#);
    }

    #[test]
    fn chomp_balanced_respects_escapes() {
        let mut q = TokenQueue::new(r"(foo\)bar)");
        let inner = q.chomp_balanced('(', ')').unwrap();
        assert_eq!(inner, r"foo\)bar");
        assert_eq!(unescape(&inner), "foo)bar");
    }

    #[test]
    fn chomp_balanced_fails_when_unbalanced() {
        let mut q = TokenQueue::new("(one (two) three");
        let err = q.chomp_balanced('(', ')').unwrap_err();
        assert_eq!(
            err.kind,
            SelectorErrorKind::UnbalancedDelimiter {
                open: '(',
                close: ')'
            }
        );
    }

    #[test]
    fn unescape_collapses_single_and_double_backslash() {
        assert_eq!(unescape(r"\)"), ")");
        assert_eq!(unescape(r"\\"), r"\");
        assert_eq!(unescape(r"\\\)"), r"\)");
        assert_eq!(unescape("no backslashes"), "no backslashes");
    }

    #[test]
    fn unescape_is_idempotent_on_its_own_output() {
        let once = unescape(r"a\\b\c");
        let twice = unescape(&once);
        assert_eq!(once, twice);
    }
}
