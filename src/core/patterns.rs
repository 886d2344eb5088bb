//! Per-country VAT number format patterns.
//!
//! Each pattern is matched against the number body (the input with the
//! two-letter prefix removed) and is anchored at both ends.

use regex::Regex;
use std::sync::LazyLock;

/// Country code → body pattern. Sorted by code for binary search.
///
/// GB accepts 9 or 12 digits only; the HMRC lookup rejects the
/// `GD`/`HA` government and health authority forms.
static PATTERN_SOURCES: &[(&str, &str)] = &[
    ("AT", r"U[A-Z0-9]{8}"),
    ("AU", r"[0-9]{11}"),
    ("BE", r"(0[0-9]{9}|[0-9]{10})"),
    ("BG", r"[0-9]{9,10}"),
    // Whitespace is stripped before matching, so "CHE-123.456.789 MWST"
    // arrives as "E-123.456.789MWST".
    ("CH", r"E-?[0-9]{3}\.?[0-9]{3}\.?[0-9]{3}(?:MWST)?"),
    ("CY", r"[0-9]{8}[A-Z]"),
    ("CZ", r"[0-9]{8,10}"),
    ("DE", r"[0-9]{9}"),
    ("DK", r"[0-9]{8}"),
    ("EE", r"[0-9]{9}"),
    ("EL", r"[0-9]{9}"),
    ("ES", r"[A-Z][0-9]{7}[A-Z]|[0-9]{8}[A-Z]|[A-Z][0-9]{8}"),
    ("FI", r"[0-9]{8}"),
    ("FR", r"([A-Z]{2}|[0-9]{2})[0-9]{9}"),
    ("GB", r"([0-9]{9}|[0-9]{12})"),
    ("HR", r"[0-9]{11}"),
    ("HU", r"[0-9]{8}"),
    ("IE", r"[A-Z0-9]{7}[A-Z]|[A-Z0-9]{7}[A-W][A-I]"),
    ("IT", r"[0-9]{11}"),
    ("LT", r"([0-9]{9}|[0-9]{12})"),
    ("LU", r"[0-9]{8}"),
    ("LV", r"[0-9]{11}"),
    ("MT", r"[0-9]{8}"),
    ("NL", r"[0-9]{9}B[0-9]{2}"),
    ("PL", r"[0-9]{10}"),
    ("PT", r"[0-9]{9}"),
    ("RO", r"[0-9]{2,10}"),
    ("SE", r"[0-9]{12}"),
    ("SI", r"[0-9]{8}"),
    ("SK", r"[0-9]{10}"),
    // Northern Ireland, same format as GB
    ("XI", r"([0-9]{9}|[0-9]{12})"),
];

/// Compiled patterns, index-aligned with `PATTERN_SOURCES`.
static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    PATTERN_SOURCES
        .iter()
        .map(|(code, src)| {
            Regex::new(&format!("^(?:{src})$"))
                .unwrap_or_else(|e| panic!("built-in pattern for {code} must compile: {e}"))
        })
        .collect()
});

/// Look up the body pattern for an (uppercase) country code.
pub fn pattern_for(country_code: &str) -> Option<&'static Regex> {
    PATTERN_SOURCES
        .binary_search_by(|(code, _)| (*code).cmp(country_code))
        .ok()
        .map(|i| &PATTERNS[i])
}

/// All country codes with a format pattern, in alphabetical order.
pub fn supported_country_codes() -> impl Iterator<Item = &'static str> {
    PATTERN_SOURCES.iter().map(|(code, _)| *code)
}

/// Whether the country's numbers also carry check digits beyond the pattern.
pub(crate) fn has_checksum(country_code: &str) -> bool {
    country_code == "AU"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_is_sorted() {
        for window in PATTERN_SOURCES.windows(2) {
            assert!(
                window[0].0 < window[1].0,
                "country codes not sorted: {} >= {}",
                window[0].0,
                window[1].0
            );
        }
    }

    #[test]
    fn all_patterns_compile() {
        assert_eq!(PATTERNS.len(), PATTERN_SOURCES.len());
        assert_eq!(supported_country_codes().count(), 31);
    }

    #[test]
    fn lookup_known_and_unknown() {
        assert!(pattern_for("DE").is_some());
        assert!(pattern_for("XI").is_some());
        assert!(pattern_for("XX").is_none());
        assert!(pattern_for("de").is_none());
        assert!(pattern_for("").is_none());
    }

    #[test]
    fn patterns_are_anchored() {
        let de = pattern_for("DE").unwrap();
        assert!(de.is_match("123456789"));
        assert!(!de.is_match("1234567890"));
        assert!(!de.is_match("X123456789"));
    }

    #[test]
    fn alternations_anchor_as_a_whole() {
        // Without the outer group, `^A|B$` would accept a prefix of the first branch.
        let es = pattern_for("ES").unwrap();
        assert!(es.is_match("X1234567X"));
        assert!(!es.is_match("X1234567XZZ"));
        assert!(!es.is_match("ZZX12345678"));
    }

    #[test]
    fn checksum_only_for_au() {
        assert!(has_checksum("AU"));
        assert!(!has_checksum("DE"));
    }
}
