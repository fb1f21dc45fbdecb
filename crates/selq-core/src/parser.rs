//! `QueryParser` — recursive-descent translation of a selector string into
//! a single [`Evaluator`].
//!
//! # Combinator folding
//!
//! The driver ([`parse`]) keeps a working list of evaluators for the
//! current compound selector. Whenever it meets a combinator character
//! (`,`, `>`, `+`, `~`, or a run of whitespace that separates two
//! compounds) it calls [`QueryParser::combinator`], which folds the
//! working list and the freshly-parsed right-hand side into one
//! evaluator and replaces the working list with it.
//!
//! The subtle part is keeping `,` lowest-precedence. `combinator` detects
//! the case where the working list is a single already-built `Or` and the
//! new combinator is not itself `,` — in that case the new combinator
//! must bind to the `Or`'s *rightmost* branch rather than to the whole
//! `Or`, so `a, b > c` parses as `Or(a, And(c, ImmediateParent(b)))` and
//! not `ImmediateParent(Or(a, b))`. This is `Evaluator::right_most` /
//! `replace_right_most`, both parser-internal.

use crate::evaluator::Evaluator;
use crate::nth;
use selq_queue::{unescape, TokenQueue};
use selq_util::{normalize, SelectorErrorKind, SelectorParseError, SelectorResult};

/// Parses `css_query` into a single evaluator tree.
///
/// This is the function [`crate::parse_selector`] wraps; it is also
/// called recursively — every combinator's right-hand side and every
/// `:has()`/`:not()` argument is parsed by calling this again over a
/// substring, so nesting (`:has(a > b)`) falls out of ordinary
/// recursion rather than special-cased grammar.
pub fn parse(css_query: &str) -> SelectorResult<Evaluator> {
    tracing::trace!(query = css_query, "parsing selector");
    let mut parser = QueryParser::new(css_query);
    parser.parse_root()
}

fn is_combinator_char(c: char) -> bool {
    matches!(c, ',' | '>' | '+' | '~')
}

struct QueryParser {
    queue: TokenQueue,
    working: Vec<Evaluator>,
}

impl QueryParser {
    fn new(css_query: &str) -> Self {
        Self {
            queue: TokenQueue::new(css_query),
            working: Vec::new(),
        }
    }

    fn err(&self, kind: SelectorErrorKind) -> SelectorParseError {
        self.queue.error(kind)
    }

    /// Consumes the whole queue, dispatching each compound selector to
    /// [`Self::find_elements`] and each combinator to [`Self::combinator`],
    /// then collapses the working list to a single result.
    fn parse_root(&mut self) -> SelectorResult<Evaluator> {
        self.queue.consume_whitespace();

        if !self.queue.is_empty() && is_combinator_char(self.queue.peek()) {
            self.working.push(Evaluator::root());
            let c = self.queue.consume();
            self.combinator(c)?;
        } else {
            self.find_elements()?;
        }

        while !self.queue.is_empty() {
            let seen_white = self.queue.consume_whitespace();
            if self.queue.is_empty() {
                break;
            }
            if is_combinator_char(self.queue.peek()) {
                let c = self.queue.consume();
                self.combinator(c)?;
            } else if seen_white {
                self.combinator(' ')?;
            } else {
                self.find_elements()?;
            }
        }

        if self.working.len() == 1 {
            Ok(self.working.pop().unwrap())
        } else {
            Ok(Evaluator::and(std::mem::take(&mut self.working)))
        }
    }

    /// Folds one combinator into the working list. See the module docs
    /// above for the rightmost-replacement trick this relies on.
    fn combinator(&mut self, c: char) -> SelectorResult<()> {
        tracing::debug!(combinator = %c, working_len = self.working.len(), "folding combinator");
        self.queue.consume_whitespace();
        let sub_query = self.consume_sub_query()?;
        let new_eval = parse(&sub_query)?;

        let replace_right_most =
            self.working.len() == 1 && self.working[0].is_or() && c != ',';

        let (splice_root, current_eval) = if replace_right_most {
            let root = self.working.pop().unwrap();
            let current = root.right_most();
            (Some(root), current)
        } else if self.working.len() == 1 {
            (None, self.working.pop().unwrap())
        } else {
            let all = std::mem::take(&mut self.working);
            (None, Evaluator::and(all))
        };
        self.working.clear();

        let combined = match c {
            '>' => Evaluator::and(vec![new_eval, Evaluator::immediate_parent(current_eval)]),
            ' ' => Evaluator::and(vec![new_eval, Evaluator::parent(current_eval)]),
            '+' => Evaluator::and(vec![
                new_eval,
                Evaluator::immediate_previous_sibling(current_eval),
            ]),
            '~' => Evaluator::and(vec![new_eval, Evaluator::previous_sibling(current_eval)]),
            ',' => {
                if current_eval.is_or() {
                    let mut merged = current_eval;
                    merged.or_append(new_eval);
                    merged
                } else {
                    Evaluator::or(current_eval, new_eval)
                }
            }
            other => return Err(self.err(SelectorErrorKind::UnknownCombinator(other))),
        };

        let result = if let Some(mut root) = splice_root {
            root.replace_right_most(combined);
            root
        } else {
            combined
        };

        self.working.push(result);
        Ok(())
    }

    /// Accumulates characters until a combinator is seen, preserving
    /// parenthesized/bracketed groups (which may contain combinator
    /// characters as literal content).
    fn consume_sub_query(&mut self) -> SelectorResult<String> {
        let mut out = String::new();
        loop {
            if self.queue.is_empty() {
                break;
            }
            if self.queue.matches_cs("(") {
                out.push('(');
                out.push_str(&self.queue.chomp_balanced('(', ')')?);
                out.push(')');
            } else if self.queue.matches_cs("[") {
                out.push('[');
                out.push_str(&self.queue.chomp_balanced('[', ']')?);
                out.push(']');
            } else if is_combinator_char(self.queue.peek()) || self.queue.matches_whitespace() {
                break;
            } else {
                out.push(self.queue.consume());
            }
        }
        Ok(out)
    }

    /// Examines the head of the queue and dispatches to exactly one
    /// production.
    fn find_elements(&mut self) -> SelectorResult<()> {
        if self.queue.match_chomp("#") {
            return self.by_id();
        }
        if self.queue.match_chomp(".") {
            return self.by_class();
        }
        if self.queue.matches_word() || self.queue.matches_cs("*|") {
            return self.by_tag();
        }
        if self.queue.matches_cs("[") {
            return self.by_attribute();
        }
        if self.queue.match_chomp("*") {
            self.working.push(Evaluator::all_elements());
            return Ok(());
        }
        if self.queue.match_chomp(":lt(") {
            let n = self.consume_index()?;
            self.working.push(Evaluator::index_less_than(n));
            return Ok(());
        }
        if self.queue.match_chomp(":gt(") {
            let n = self.consume_index()?;
            self.working.push(Evaluator::index_greater_than(n));
            return Ok(());
        }
        if self.queue.match_chomp(":eq(") {
            let n = self.consume_index()?;
            self.working.push(Evaluator::index_equals(n));
            return Ok(());
        }
        if self.queue.matches_cs(":has(") {
            return self.by_has();
        }
        if self.queue.matches_cs(":containsData(") {
            return self.by_contains_data();
        }
        if self.queue.matches_cs(":containsOwn(") {
            return self.by_contains(true);
        }
        if self.queue.matches_cs(":contains(") {
            return self.by_contains(false);
        }
        if self.queue.matches_cs(":matchesOwn(") {
            return self.by_matches(true);
        }
        if self.queue.matches_cs(":matches(") {
            return self.by_matches(false);
        }
        if self.queue.matches_cs(":not(") {
            return self.by_not();
        }
        if self.queue.match_chomp(":nth-last-child(") {
            return self.by_nth(false, true);
        }
        if self.queue.match_chomp(":nth-child(") {
            return self.by_nth(false, false);
        }
        if self.queue.match_chomp(":nth-last-of-type(") {
            return self.by_nth(true, true);
        }
        if self.queue.match_chomp(":nth-of-type(") {
            return self.by_nth(true, false);
        }
        if self.queue.match_chomp(":first-child") {
            self.working.push(Evaluator::is_first_child());
            return Ok(());
        }
        if self.queue.match_chomp(":last-child") {
            self.working.push(Evaluator::is_last_child());
            return Ok(());
        }
        if self.queue.match_chomp(":first-of-type") {
            self.working.push(Evaluator::is_first_of_type());
            return Ok(());
        }
        if self.queue.match_chomp(":last-of-type") {
            self.working.push(Evaluator::is_last_of_type());
            return Ok(());
        }
        if self.queue.match_chomp(":only-child") {
            self.working.push(Evaluator::is_only_child());
            return Ok(());
        }
        if self.queue.match_chomp(":only-of-type") {
            self.working.push(Evaluator::is_only_of_type());
            return Ok(());
        }
        if self.queue.match_chomp(":empty") {
            self.working.push(Evaluator::is_empty());
            return Ok(());
        }
        if self.queue.match_chomp(":root") {
            self.working.push(Evaluator::is_root());
            return Ok(());
        }
        if self.queue.match_chomp(":matchText") {
            self.working.push(Evaluator::match_text());
            return Ok(());
        }

        let remaining = self.queue.buffer()[self.queue.pos()..].to_string();
        Err(self.err(SelectorErrorKind::UnexpectedToken(remaining)))
    }

    fn by_id(&mut self) -> SelectorResult<()> {
        let id = self.queue.consume_css_identifier();
        if id.is_empty() {
            return Err(self.err(SelectorErrorKind::EmptyRequiredToken("id")));
        }
        self.working.push(Evaluator::id(id));
        Ok(())
    }

    fn by_class(&mut self) -> SelectorResult<()> {
        let name = self.queue.consume_css_identifier();
        if name.is_empty() {
            return Err(self.err(SelectorErrorKind::EmptyRequiredToken("class name")));
        }
        self.working.push(Evaluator::class(name.trim().to_string()));
        Ok(())
    }

    /// Tag production: a bare word, optionally namespace-qualified
    /// (`ns|local`) or namespace-wildcarded (`*|local`).
    fn by_tag(&mut self) -> SelectorResult<()> {
        let name = self.queue.consume_element_selector();
        if name.is_empty() {
            return Err(self.err(SelectorErrorKind::EmptyRequiredToken("tag name")));
        }
        if let Some(local) = name.strip_prefix("*|") {
            if local.is_empty() {
                return Err(self.err(SelectorErrorKind::EmptyRequiredToken("tag name")));
            }
            let tag = normalize(local);
            let suffix = normalize(&format!(":{local}"));
            self.working
                .push(Evaluator::or(Evaluator::tag(tag), Evaluator::tag_ends_with(suffix)));
        } else {
            let fixed = name.replace('|', ":");
            self.working.push(Evaluator::tag(fixed.trim().to_string()));
        }
        Ok(())
    }

    /// Attribute production: `[key]`, `[^keyPrefix]`, or
    /// `[key<op>value]` for each of the six comparison operators.
    fn by_attribute(&mut self) -> SelectorResult<()> {
        let inner = self.queue.chomp_balanced('[', ']')?;
        let mut cq = TokenQueue::new(&inner);
        let key = cq.consume_to_any(&["=", "!=", "^=", "$=", "*=", "~="]);
        if key.is_empty() {
            return Err(self.err(SelectorErrorKind::EmptyRequiredToken("attribute key")));
        }
        cq.consume_whitespace();

        if cq.is_empty() {
            self.working.push(if let Some(prefix) = key.strip_prefix('^') {
                Evaluator::attribute_starting(prefix.to_string())
            } else {
                Evaluator::attribute(key)
            });
            return Ok(());
        }

        let eval = if cq.match_chomp("!=") {
            Evaluator::attribute_with_value_not(key, cq.remainder())
        } else if cq.match_chomp("^=") {
            Evaluator::attribute_with_value_starting(key, cq.remainder())
        } else if cq.match_chomp("$=") {
            Evaluator::attribute_with_value_ending(key, cq.remainder())
        } else if cq.match_chomp("*=") {
            Evaluator::attribute_with_value_containing(key, cq.remainder())
        } else if cq.match_chomp("~=") {
            let pattern = cq.remainder();
            Evaluator::attribute_with_value_matching(key, &pattern).map_err(|k| self.err(k))?
        } else if cq.match_chomp("=") {
            Evaluator::attribute_with_value(key, cq.remainder())
        } else {
            return Err(self.err(SelectorErrorKind::UnexpectedToken(cq.remainder())));
        };
        self.working.push(eval);
        Ok(())
    }

    fn by_has(&mut self) -> SelectorResult<()> {
        self.queue.consume_str(":has")?;
        let inner = self.queue.chomp_balanced('(', ')')?;
        let inner_eval = parse(&inner)?;
        self.working.push(Evaluator::has(inner_eval));
        Ok(())
    }

    fn by_not(&mut self) -> SelectorResult<()> {
        self.queue.consume_str(":not")?;
        let inner = self.queue.chomp_balanced('(', ')')?;
        let inner_eval = parse(&inner)?;
        self.working.push(Evaluator::not(inner_eval));
        Ok(())
    }

    fn by_contains(&mut self, own: bool) -> SelectorResult<()> {
        self.queue
            .consume_str(if own { ":containsOwn" } else { ":contains" })?;
        let raw = self.queue.chomp_balanced('(', ')')?;
        let text = unescape(&raw);
        self.working.push(if own {
            Evaluator::contains_own_text(text)
        } else {
            Evaluator::contains_text(text)
        });
        Ok(())
    }

    fn by_contains_data(&mut self) -> SelectorResult<()> {
        self.queue.consume_str(":containsData")?;
        let raw = self.queue.chomp_balanced('(', ')')?;
        self.working.push(Evaluator::contains_data(unescape(&raw)));
        Ok(())
    }

    fn by_matches(&mut self, own: bool) -> SelectorResult<()> {
        self.queue
            .consume_str(if own { ":matchesOwn" } else { ":matches" })?;
        let pattern = self.queue.chomp_balanced('(', ')')?;
        let eval = if own {
            Evaluator::matches_own(&pattern)
        } else {
            Evaluator::matches(&pattern)
        }
        .map_err(|k| self.err(k))?;
        self.working.push(eval);
        Ok(())
    }

    /// `:nth-*()` family. The `:nth-*(` prefix (including the opening
    /// paren) has already been consumed by the dispatch table in
    /// [`Self::find_elements`].
    fn by_nth(&mut self, of_type: bool, backwards: bool) -> SelectorResult<()> {
        let raw = self.queue.chomp_to(")");
        let arg = normalize(&raw);
        let (a, b) = nth::parse_nth_formula(&arg).map_err(|k| self.err(k))?;
        let eval = match (of_type, backwards) {
            (false, false) => Evaluator::is_nth_child(a, b),
            (false, true) => Evaluator::is_nth_last_child(a, b),
            (true, false) => Evaluator::is_nth_of_type(a, b),
            (true, true) => Evaluator::is_nth_last_of_type(a, b),
        };
        self.working.push(eval);
        Ok(())
    }

    /// Shared digit-only argument parser for `:lt()`/`:gt()`/`:eq()`.
    fn consume_index(&mut self) -> SelectorResult<i64> {
        let raw = self.queue.chomp_to(")");
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(self.err(SelectorErrorKind::BadIndex(trimmed.to_string())));
        }
        trimmed
            .parse()
            .map_err(|_| self.err(SelectorErrorKind::BadIndex(trimmed.to_string())))
    }
}
