//! Identifier normalization

use crate::types::IdentifierClass;

/// Characters that carry no meaning in an identifier: whitespace, dashes, underscores
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '-' || c == '_'
}

/// Remove only formatting separators, keeping every other character
pub fn strip_separators(raw: &str) -> String {
    raw.chars().filter(|c| !is_separator(*c)).collect()
}

/// Reduce raw input to the canonical comparable form for its class
///
/// Separators are always dropped. Consumer identifiers keep digits only;
/// reference numbers keep ASCII letters and digits with their case intact.
/// The result is idempotent under repeated normalization.
pub fn normalize(raw: &str, class: IdentifierClass) -> String {
    raw.chars()
        .filter(|c| !is_separator(*c) && class.accepts(*c))
        .collect()
}

/// Reference pattern a stored consumer identifier answers to
///
/// Built from the tag followed by the last eight digits of the identifier,
/// upper-cased so reference queries can be compared case-insensitively.
pub fn reference_pattern(consumer_identifier: &str, tag: &str) -> String {
    let digits = normalize(consumer_identifier, IdentifierClass::ConsumerIdentifier);
    let tail = &digits[digits.len().saturating_sub(8)..];
    format!("{tag}{tail}").to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONSUMER: IdentifierClass = IdentifierClass::ConsumerIdentifier;
    const REFERENCE: IdentifierClass = IdentifierClass::ReferenceNumber;

    #[test]
    fn test_normalize_strips_separators() {
        assert_eq!(normalize("123 456-7890", CONSUMER), "1234567890");
        assert_eq!(normalize(" 98_76\t5432 1098 ", CONSUMER), "987654321098");
        assert_eq!(normalize("REF-1234_5678", REFERENCE), "REF12345678");
    }

    #[test]
    fn test_consumer_normalization_drops_stray_characters() {
        assert_eq!(normalize("12.34/5678#90", CONSUMER), "1234567890");
        assert_eq!(normalize("ID: 1234567890", CONSUMER), "1234567890");
    }

    #[test]
    fn test_reference_normalization_preserves_case() {
        assert_eq!(normalize("ref 1234.5678", REFERENCE), "ref12345678");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["123 456-7890", "1234567890", "  -_ ", "bil-9876_54321", "x1y2z3"] {
            for class in [CONSUMER, REFERENCE] {
                let once = normalize(raw, class);
                assert_eq!(normalize(&once, class), once);
            }
        }
    }

    #[test]
    fn test_strip_separators_keeps_other_characters() {
        assert_eq!(strip_separators("12a4 56-7_8"), "12a45678");
    }

    #[test]
    fn test_reference_pattern() {
        assert_eq!(reference_pattern("987654321098", "REF"), "REF54321098");
        assert_eq!(reference_pattern("1234567890", "ref"), "REF34567890");
        assert_eq!(reference_pattern("12345", "REF"), "REF12345");
    }
}
