//! String normalization shared by the queue and the parser.
//!
//! `normalize` is the one piece of the host repository's normalization
//! helper the selector core actually depends on: lowercasing (for
//! case-insensitive tag/attribute comparisons) and trimming (for values
//! pulled out of `consume_css_identifier`/`chomp_to` that may carry
//! incidental surrounding whitespace). It is used only for tag names and
//! nth-formula arguments, never for attribute values, which must stay
//! byte-exact.

/// Lowercases and trims `s`.
///
/// Rust has no runtime locale, so "English locale" lowering is just
/// [`str::to_lowercase`] — it performs full Unicode case folding, which
/// agrees with ASCII/English lowering on the identifier characters this
/// function actually sees in practice (tag names, nth arguments).
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize("  DIV  "), "div");
        assert_eq!(normalize("Ns|Tag"), "ns|tag");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn idempotent() {
        let once = normalize("  Foo Bar ");
        assert_eq!(normalize(&once), once);
    }
}
