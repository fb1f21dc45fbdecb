//! `An+B` nth-formula parsing, shared by `:nth-child()`, `:nth-last-child()`,
//! `:nth-of-type()`, and `:nth-last-of-type()`.
//!
//! Kept as a standalone module rather than inlined into
//! [`crate::parser`]'s production table because the grammar (`odd`,
//! `even`, `AnB`, bare `B`) is a small self-contained state machine that
//! several productions share verbatim.

use selq_util::SelectorErrorKind;
use std::sync::OnceLock;

fn anb_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"(?i)^([+-]?\d*)n(\s*[+-]?\s*\d+)?$").unwrap())
}

fn b_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^([+-]?)(\d+)$").unwrap())
}

/// Parses an already-normalized (lowercased, trimmed) nth-formula
/// argument into `(a, b)`: `odd` → `(2,1)`, `even` → `(2,0)`, `AnB` →
/// coefficient/offset pulled out of a regex with `a` defaulting to `1`
/// and `b` to `0` when absent, bare `B` → `(0, b)`.
pub fn parse_nth_formula(arg: &str) -> Result<(i32, i32), SelectorErrorKind> {
    match arg {
        "odd" => return Ok((2, 1)),
        "even" => return Ok((2, 0)),
        _ => {}
    }

    if let Some(caps) = anb_regex().captures(arg) {
        let coeff = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let a = if coeff.is_empty() {
            1
        } else {
            parse_signed(coeff).ok_or_else(|| bad_formula(arg))?
        };
        let offset = caps.get(2).map(|m| m.as_str().replace(' ', ""));
        let b = match offset {
            Some(s) if !s.is_empty() => parse_signed(&s).ok_or_else(|| bad_formula(arg))?,
            _ => 0,
        };
        return Ok((a, b));
    }

    if let Some(caps) = b_regex().captures(arg) {
        let sign = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let digits = &caps[2];
        let magnitude: i32 = digits.parse().map_err(|_| bad_formula(arg))?;
        let b = if sign == "-" { -magnitude } else { magnitude };
        return Ok((0, b));
    }

    Err(bad_formula(arg))
}

fn bad_formula(arg: &str) -> SelectorErrorKind {
    SelectorErrorKind::BadNthFormula(arg.to_string())
}

/// Parses a `[+-]?\d*` string. A bare sign with no digits (`"-"` or
/// `"+"`) is the coefficient shorthand for `-1`/`1` (as in `-n` / `+n`);
/// otherwise strips a leading `+` (`i32::from_str` accepts a leading `-`
/// but rejects a leading `+`) and parses the rest.
fn parse_signed(s: &str) -> Option<i32> {
    let s = s.trim();
    match s {
        "-" => return Some(-1),
        "+" | "" => return Some(1),
        _ => {}
    }
    let stripped = s.strip_prefix('+').unwrap_or(s);
    stripped.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_and_even() {
        assert_eq!(parse_nth_formula("odd").unwrap(), (2, 1));
        assert_eq!(parse_nth_formula("even").unwrap(), (2, 0));
    }

    #[test]
    fn anb_full_form() {
        assert_eq!(parse_nth_formula("2n+1").unwrap(), (2, 1));
        assert_eq!(parse_nth_formula("-2n+1").unwrap(), (-2, 1));
        assert_eq!(parse_nth_formula("2n-1").unwrap(), (2, -1));
        assert_eq!(parse_nth_formula("2n + 1").unwrap(), (2, 1));
    }

    #[test]
    fn anb_bare_n_defaults_coefficient_to_one() {
        assert_eq!(parse_nth_formula("n+3").unwrap(), (1, 3));
        assert_eq!(parse_nth_formula("n").unwrap(), (1, 0));
        assert_eq!(parse_nth_formula("-n+3").unwrap(), (-1, 3));
    }

    #[test]
    fn bare_b_form() {
        assert_eq!(parse_nth_formula("5").unwrap(), (0, 5));
        assert_eq!(parse_nth_formula("-5").unwrap(), (0, -5));
        assert_eq!(parse_nth_formula("+5").unwrap(), (0, 5));
    }

    #[test]
    fn unrecognized_form_errors() {
        let err = parse_nth_formula("banana").unwrap_err();
        assert_eq!(err, SelectorErrorKind::BadNthFormula("banana".to_string()));
    }
}
