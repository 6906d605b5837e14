use std::sync::LazyLock;

use regex::Regex;

/// "Kinosonik Riders" with ASCII-only case folding, so look-alikes such as
/// the Kelvin sign never stand in for a letter. Any Unicode whitespace, or
/// none, may separate the two words.
static SEAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i-u:kinosonik)\s*(?i-u:riders)").unwrap());

/// Does the text claim to be sealed?
pub fn contains_marker(text: &str) -> bool {
    SEAL_MARKER.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_canonical_marker() {
        assert!(contains_marker("Kinosonik Riders RID:104"));
    }

    #[test]
    fn case_insensitive() {
        assert!(contains_marker("KINOSONIK RIDERS"));
        assert!(contains_marker("kinosonik riders"));
        assert!(contains_marker("KiNoSoNiK rIdErS"));
    }

    #[test]
    fn tolerates_internal_whitespace() {
        assert!(contains_marker("Kinosonik\n\n   Riders"));
        assert!(contains_marker("Kinosonik\t\u{00A0}Riders"));
        assert!(contains_marker("KinosonikRiders"));
    }

    #[test]
    fn found_anywhere_in_page() {
        let text = format!("{}\nIssued by Kinosonik Riders\n{}", "lorem ".repeat(500), "ipsum");
        assert!(contains_marker(&text));
    }

    #[test]
    fn absent_marker() {
        assert!(!contains_marker("Hello world"));
        assert!(!contains_marker(""));
        assert!(!contains_marker("Kinosonik"));
        assert!(!contains_marker("Riders"));
        assert!(!contains_marker("Kinosonik-Riders"));
    }

    #[test]
    fn unicode_look_alikes_rejected() {
        // Kelvin sign folds to 'k' under Unicode rules
        assert!(!contains_marker("\u{212A}inosonik Riders"));
        // Cyrillic 'о'
        assert!(!contains_marker("Kin\u{043E}sonik Riders"));
        // Fullwidth Latin
        assert!(!contains_marker("\u{FF2B}inosonik Riders"));
    }
}
