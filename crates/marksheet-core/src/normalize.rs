//! Text normalization for query comparison and de-duplication.
//!
//! Steps run in a fixed order; later steps assume earlier ones ran:
//!
//! 1. Canonical decomposition (NFD)
//! 2. Strip combining diacritical marks (U+0300–U+036F)
//! 3. Strip everything that is neither a word character nor whitespace
//! 4. Strip C0/C1 control characters (U+0000–U+001F, U+007F–U+009F)
//! 5. Collapse whitespace runs to a single space
//! 6. Trim
//! 7. Lower-case under [`NORMALIZATION_LOCALE`]
//!
//! Word characters are `[A-Za-z0-9_]`. Whitespace is Unicode `White_Space`
//! plus U+FEFF. Tab and newline are control characters, so they survive
//! step 3 and disappear in step 4 without leaving a separator.
//!
//! The output only ever contains ASCII word characters and single spaces,
//! which makes the function idempotent.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Locale that lower-casing is pinned to. Never read from the environment.
///
/// English has no case tailoring, so default Unicode lower-casing is exact.
pub const NORMALIZATION_LOCALE: &str = "en";

lazy_static! {
    /// Combining Diacritical Marks block.
    static ref COMBINING_MARKS: Regex = Regex::new(r"[\x{0300}-\x{036F}]").unwrap();

    /// Anything that is not a word character or whitespace.
    static ref SYMBOLS: Regex = Regex::new(r"[^A-Za-z0-9_\s\x{FEFF}]").unwrap();

    /// C0 and C1 control characters.
    static ref CONTROL: Regex = Regex::new(r"[\x00-\x1F\x7F-\x9F]").unwrap();

    static ref WHITESPACE_RUN: Regex = Regex::new(r"[\s\x{FEFF}]+").unwrap();
}

/// Map a string to its canonical comparison form. Total; never fails.
pub fn normalize(input: &str) -> String {
    let decomposed: String = input.nfd().collect();
    let unmarked = COMBINING_MARKS.replace_all(&decomposed, "");
    let unsymboled = SYMBOLS.replace_all(&unmarked, "");
    let visible = CONTROL.replace_all(&unsymboled, "");
    let collapsed = WHITESPACE_RUN.replace_all(&visible, " ");
    lowercase_pinned(collapsed.trim())
}

/// Lower-casing for [`NORMALIZATION_LOCALE`]. Must not consult the host locale.
///
/// Input is ASCII-only by this point, so the pinned locale has no tailoring
/// to apply and no other locale could produce a different result.
fn lowercase_pinned(text: &str) -> String {
    debug_assert!(text.is_ascii(), "lower-casing runs after non-ASCII is stripped");
    text.to_ascii_lowercase()
}

/// True when two queries are the same after normalization.
pub fn same_query(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_examples() {
        assert_eq!(normalize("Café!"), "cafe");
        assert_eq!(normalize("  Hello   World  "), "hello world");
        assert_eq!(normalize("100% sure?"), "100 sure");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_precomposed_and_decomposed_agree() {
        assert_eq!(normalize("Crème Brûlée"), "creme brulee");
        assert_eq!(normalize("Cre\u{0300}me"), "creme");
    }

    #[test]
    fn test_symbols_only_becomes_empty() {
        assert_eq!(normalize("?!#$%^&*()"), "");
        assert_eq!(normalize(" - "), "");
    }

    #[test]
    fn test_underscore_and_digits_kept() {
        assert_eq!(normalize("snake_case 42"), "snake_case 42");
    }

    #[test]
    fn test_control_whitespace_removed_without_separator() {
        assert_eq!(normalize("hello\tworld"), "helloworld");
        assert_eq!(normalize("line one\nline two"), "line oneline two");
    }

    #[test]
    fn test_unicode_spaces_collapse() {
        assert_eq!(normalize("a\u{00A0}\u{2003}b"), "a b");
        assert_eq!(normalize("a\u{FEFF}b"), "a b");
    }

    #[test]
    fn test_non_latin_letters_stripped() {
        assert_eq!(normalize("Straße"), "strae");
        assert_eq!(normalize("what is ПК"), "what is");
    }

    #[test]
    fn test_lowercase_independent_of_locale_tailoring() {
        // Dotted capital I and the Kelvin sign decompose to ASCII before lower-casing.
        assert_eq!(normalize("\u{0130}STANBUL"), "istanbul");
        assert_eq!(normalize("\u{212A}ELVIN"), "kelvin");
        assert_eq!(normalize("ÀÉÎ"), "aei");
    }

    #[test]
    fn test_same_query() {
        assert!(same_query(
            "What is phishing?",
            "  what IS phishing  "
        ));
        assert!(!same_query("phishing", "fishing"));
    }
}
