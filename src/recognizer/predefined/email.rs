//! Email address recognizer

use crate::domain::Result;
use crate::recognizer::context::ContextEnhancer;
use crate::recognizer::pattern::{CompiledPattern, PatternDefinition, PatternRecognizer};

/// Entity type for email addresses
pub const EMAIL_ENTITY: &str = "EMAIL_ADDRESS";

/// Score of a syntactically valid address
pub const EMAIL_SCORE: f32 = 1.0;

/// Context words used when none are configured
pub const DEFAULT_EMAIL_CONTEXT: &[&str] = &["email", "mail", "メール"];

// ASCII-only classes: `\w` would swallow adjacent kana/kanji in Japanese text.
const EMAIL_PATTERN: &str = r"(?<![A-Za-z0-9._%+\-])[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}(?![A-Za-z0-9\-])";

/// Reject addresses the pattern admits but RFC 5321 does not
pub fn is_valid_email(candidate: &str) -> bool {
    let Some((local, domain)) = candidate.rsplit_once('@') else {
        return false;
    };

    !local.is_empty()
        && local.len() <= 64
        && domain.len() <= 255
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
}

/// Build the email recognizer
pub fn recognizer(name: &str, language: &str, context: ContextEnhancer) -> Result<PatternRecognizer> {
    let definition = PatternDefinition {
        name: "email address".to_string(),
        regex: EMAIL_PATTERN.to_string(),
        score: EMAIL_SCORE,
    };
    let pattern = CompiledPattern::compile(name, &definition)?.with_validator(is_valid_email);
    PatternRecognizer::new(name, language, EMAIL_ENTITY, vec![pattern], context)
}
