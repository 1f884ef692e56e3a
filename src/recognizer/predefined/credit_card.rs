//! Credit card number recognizer with Luhn validation

use crate::domain::Result;
use crate::recognizer::context::ContextEnhancer;
use crate::recognizer::pattern::{CompiledPattern, PatternDefinition, PatternRecognizer};

/// Entity type for credit card numbers
pub const CREDIT_CARD_ENTITY: &str = "CREDIT_CARD";

/// Score of a checksum-valid number
pub const CREDIT_CARD_SCORE: f32 = 1.0;

/// Context words used when none are configured
pub const DEFAULT_CREDIT_CARD_CONTEXT: &[&str] = &[
    "credit",
    "card",
    "visa",
    "mastercard",
    "amex",
    "jcb",
    "カード",
];

const CREDIT_CARD_PATTERN: &str = r"(?<![0-9])(?:4[0-9]{3}|5[0-5][0-9]{2}|6[0-9]{3}|1[0-9]{3}|3[0-9]{3})[- ]?[0-9]{3,4}[- ]?[0-9]{3,4}[- ]?[0-9]{3,5}(?![0-9])";

/// Luhn checksum over the digits of `card_number` (13-19 digits)
pub fn is_valid_luhn(card_number: &str) -> bool {
    let digits: Vec<u32> = card_number.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let checksum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &digit)| {
            if idx % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    checksum % 10 == 0
}

/// Build the credit card recognizer
pub fn recognizer(name: &str, language: &str, context: ContextEnhancer) -> Result<PatternRecognizer> {
    let definition = PatternDefinition {
        name: "credit card number".to_string(),
        regex: CREDIT_CARD_PATTERN.to_string(),
        score: CREDIT_CARD_SCORE,
    };
    let pattern = CompiledPattern::compile(name, &definition)?.with_validator(is_valid_luhn);
    PatternRecognizer::new(name, language, CREDIT_CARD_ENTITY, vec![pattern], context)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credit_card() -> PatternRecognizer {
        recognizer("credit_card", "ja", ContextEnhancer::disabled()).unwrap()
    }

    #[test]
    fn test_luhn() {
        assert!(is_valid_luhn("4111 1111 1111 1111"));
        assert!(is_valid_luhn("5500-0000-0000-0004"));
        assert!(!is_valid_luhn("4111111111111112"));
        assert!(!is_valid_luhn("4444-5555-6666-7777"));
        assert!(!is_valid_luhn("4111"));
    }

    #[test]
    fn test_detects_valid_card() {
        let candidates = credit_card()
            .analyze("カード番号は4111-1111-1111-1111です")
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!((candidates[0].start, candidates[0].end), (6, 25));
    }

    #[test]
    fn test_checksum_failure_is_dropped() {
        let candidates = credit_card()
            .analyze("VISA/4444-5555-6666-7777")
            .unwrap();
        assert!(candidates.is_empty());
    }
}
