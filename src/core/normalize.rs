//! Text normalization for entity matching
//!
//! Every comparison against catalog vocabulary (countries, cities, month
//! names) happens in this canonical space, never on raw text.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize text: NFD decompose, drop combining marks, lowercase.
///
/// Pure and idempotent: `normalize(normalize(x)) == normalize(x)`.
/// Example: "Róterdam" -> "roterdam"
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_diacritics() {
        assert_eq!(normalize("Róterdam"), "roterdam");
        assert_eq!(normalize("Málaga"), "malaga");
        assert_eq!(normalize("ESPAÑA"), "espana");
    }

    #[test]
    fn test_case_and_diacritic_insensitive() {
        assert_eq!(normalize("Róterdam"), normalize("ROTERDAM"));
        assert_eq!(normalize("tecnología"), normalize("TECNOLOGIA"));
    }

    #[test]
    fn test_idempotent() {
        let once = normalize("Búsqueda en São Paulo");
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_plain_ascii_unchanged() {
        assert_eq!(normalize("berlin"), "berlin");
        assert_eq!(normalize(""), "");
    }
}
