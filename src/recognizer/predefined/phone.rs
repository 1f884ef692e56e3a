//! Region-aware phone number recognizer

use crate::domain::{Result, ScrubError};
use crate::recognizer::context::ContextEnhancer;
use crate::recognizer::pattern::{CompiledPattern, PatternDefinition, PatternRecognizer, Validator};

/// Entity type for phone numbers
pub const PHONE_ENTITY: &str = "PHONE_NUMBER";

/// Base score of a grammar-valid phone number
pub const PHONE_SCORE: f32 = 0.4;

/// Context words used when none are configured
pub const DEFAULT_PHONE_CONTEXT: &[&str] = &[
    "phone",
    "number",
    "telephone",
    "cell",
    "cellphone",
    "mobile",
    "call",
];

/// Regions with a phone grammar
pub const SUPPORTED_REGIONS: &[&str] = &["JP", "US"];

const JP_PATTERN: &str =
    r"(?<![0-9])(?:\+81[- ]?|0)[0-9]{1,4}[- ]?[0-9]{1,4}[- ]?[0-9]{3,4}(?![0-9])";

const US_PATTERN: &str = r"(?<![0-9])(?:\+?1[-. ]?)?(?:\([0-9]{3}\)|[0-9]{3})[-. ]?[0-9]{3}[-. ]?[0-9]{4}(?![0-9])";

fn digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Japanese numbers: trunk prefix `0` (or `+81`), 10 digits, or 11 digits for
/// IP/mobile/free-dial ranges (050, 070, 080, 090).
pub fn is_valid_jp(candidate: &str) -> bool {
    let raw = digits(candidate);
    let national = if candidate.trim_start().starts_with("+81") {
        format!("0{}", &raw[2..])
    } else {
        raw
    };

    if !national.starts_with('0') || national[1..].starts_with('0') {
        return false;
    }

    let long_prefix = ["050", "070", "080", "090"]
        .iter()
        .any(|prefix| national.starts_with(prefix));

    match national.len() {
        10 => !long_prefix,
        11 => long_prefix,
        _ => false,
    }
}

/// North American numbering plan: 10 digits, area code and exchange 2-9
pub fn is_valid_us(candidate: &str) -> bool {
    let raw = digits(candidate);
    let national = match raw.len() {
        11 if raw.starts_with('1') => &raw[1..],
        10 => raw.as_str(),
        _ => return false,
    };

    let bytes = national.as_bytes();
    (b'2'..=b'9').contains(&bytes[0]) && (b'2'..=b'9').contains(&bytes[3])
}

fn grammar(region: &str) -> Option<(&'static str, Validator)> {
    match region {
        "JP" => Some((JP_PATTERN, is_valid_jp as Validator)),
        "US" => Some((US_PATTERN, is_valid_us as Validator)),
        _ => None,
    }
}

/// Build a phone recognizer for the given regions
pub fn recognizer(
    name: &str,
    language: &str,
    regions: &[String],
    context: ContextEnhancer,
) -> Result<PatternRecognizer> {
    if regions.is_empty() {
        return Err(ScrubError::invalid_recognizer(name, "no phone regions configured"));
    }

    let mut patterns = Vec::with_capacity(regions.len());
    for region in regions {
        let region = region.to_uppercase();
        let (regex, validator) = grammar(&region).ok_or_else(|| {
            ScrubError::invalid_recognizer(
                name,
                format!(
                    "unsupported phone region '{region}' (supported: {})",
                    SUPPORTED_REGIONS.join(", ")
                ),
            )
        })?;

        let definition = PatternDefinition {
            name: format!("{} phone number", region),
            regex: regex.to_string(),
            score: PHONE_SCORE,
        };
        patterns.push(CompiledPattern::compile(name, &definition)?.with_validator(validator));
    }

    PatternRecognizer::new(name, language, PHONE_ENTITY, patterns, context)
}
