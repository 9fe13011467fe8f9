//! Shape check for user supplied ISBNs.

use once_cell::sync::Lazy;
use regex::Regex;

// Optional 978/979 prefix, nine digits and a final digit or `X` check character.
static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(97(8|9))?\d{9}(\d|X)$").expect("valid isbn regex"));

/// Returns `true` when `input` has the shape of an ISBN-10 or ISBN-13.
///
/// Only the shape is checked, the check digit is not verified.
#[must_use]
pub fn is_isbn(input: &str) -> bool {
    ISBN_RE.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::is_isbn;

    #[test]
    fn isbn_13_matches() {
        assert!(is_isbn("9780306406157"));
        assert!(is_isbn("9790306406157"));
    }

    #[test]
    fn isbn_10_matches() {
        assert!(is_isbn("0306406152"));
        assert!(is_isbn("080442957X"));
    }

    #[test]
    fn titles_do_not_match() {
        assert!(!is_isbn("hello world"));
        assert!(!is_isbn("Dune"));
        assert!(!is_isbn(""));
    }

    #[test]
    fn thirteen_digits_without_bookland_prefix_do_not_match() {
        assert!(!is_isbn("1234567890123"));
        assert!(!is_isbn("9770306406157"));
    }

    #[test]
    fn hyphens_and_lowercase_check_character_do_not_match() {
        assert!(!is_isbn("978-0306406157"));
        assert!(!is_isbn("080442957x"));
    }
}
