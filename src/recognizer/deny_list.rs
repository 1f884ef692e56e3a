//! Deny-list recognizer
//!
//! Marks literal strings that look like sensitive data but must never be
//! redacted (company names, product codes, sample card numbers in docs).
//! Every occurrence becomes a `DENY` candidate, which the resolver uses as a
//! veto against overlapping detections.

use super::Recognizer;
use crate::domain::{Candidate, CharIndex, Result, ScrubError, DENY_ENTITY};
use async_trait::async_trait;

/// Default score of deny-list matches
pub const DEFAULT_DENY_SCORE: f32 = 0.9;

/// Exact, case-sensitive literal matcher
#[derive(Debug, Clone)]
pub struct DenyListRecognizer {
    name: String,
    language: String,
    entities: Vec<String>,
    words: Vec<String>,
    score: f32,
}

impl DenyListRecognizer {
    /// Create a deny-list recognizer; duplicate literals are collapsed
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        words: &[String],
        score: f32,
    ) -> Result<Self> {
        let name = name.into();
        if words.is_empty() {
            return Err(ScrubError::invalid_recognizer(&name, "deny list is empty"));
        }
        if words.iter().any(|w| w.is_empty()) {
            return Err(ScrubError::invalid_recognizer(
                &name,
                "deny list contains an empty string",
            ));
        }
        if !(0.0..=1.0).contains(&score) {
            return Err(ScrubError::invalid_recognizer(
                &name,
                format!("score {score} is outside [0.0, 1.0]"),
            ));
        }

        let mut unique: Vec<String> = Vec::with_capacity(words.len());
        for word in words {
            if !unique.contains(word) {
                unique.push(word.clone());
            }
        }

        Ok(Self {
            name,
            language: language.into(),
            entities: vec![DENY_ENTITY.to_string()],
            words: unique,
            score,
        })
    }

    /// Literals matched by this recognizer
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Find every occurrence of every literal
    pub fn analyze(&self, text: &str) -> Vec<Candidate> {
        let index = CharIndex::new(text);
        let mut candidates = Vec::new();

        for word in &self.words {
            for (byte_start, matched) in text.match_indices(word.as_str()) {
                let Some(chars) = index.char_range(byte_start..byte_start + matched.len()) else {
                    continue;
                };
                candidates.push(Candidate::new(
                    DENY_ENTITY,
                    chars.start,
                    chars.end,
                    self.score,
                    &self.name,
                ));
            }
        }

        candidates
    }
}

#[async_trait]
impl Recognizer for DenyListRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_language(&self) -> &str {
        &self.language
    }

    fn supported_entities(&self) -> &[String] {
        &self.entities
    }

    async fn scan(&self, text: &str, _language: &str) -> anyhow::Result<Vec<Candidate>> {
        Ok(self.analyze(text))
    }
}
