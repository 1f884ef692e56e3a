//! Offset-safe text rewriting

use super::rules::AnonymizationRules;
use crate::domain::{CharIndex, ResolvedSpans, Result, ScrubError};
use serde::{Deserialize, Serialize};

/// Record of one replacement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entity_type: String,
    /// Start character offset in the original text
    pub start: usize,
    /// End character offset in the original text (exclusive)
    pub end: usize,
    pub score: f32,
    /// Recognizer that produced the span
    pub origin: String,
    /// Original substring
    pub original: String,
    /// Text spliced in its place
    pub replacement: String,
}

/// Applies anonymization rules to resolved spans
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    rules: AnonymizationRules,
}

impl Rewriter {
    pub fn new(rules: AnonymizationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &AnonymizationRules {
        &self.rules
    }

    /// Produce the redacted text and one audit entry per span (ascending order)
    ///
    /// Spans are spliced from the last to the first, so byte offsets computed
    /// on the original text stay valid for every span still to be applied.
    ///
    /// # Errors
    ///
    /// Returns [`ScrubError::SpanOutOfBounds`] if a span does not fit `text`.
    pub fn rewrite(&self, text: &str, spans: &ResolvedSpans) -> Result<(String, Vec<AuditEntry>)> {
        let index = CharIndex::new(text);
        let len = index.char_len();

        let mut output = text.to_string();
        let mut audit = Vec::with_capacity(spans.len());

        for span in spans.iter().rev() {
            let bytes = index
                .byte_range(span.start..span.end)
                .ok_or(ScrubError::SpanOutOfBounds {
                    start: span.start,
                    end: span.end,
                    len,
                })?;

            let original = &text[bytes.clone()];
            let replacement = self
                .rules
                .operator_for(&span.entity_type)
                .apply(&span.entity_type, original);

            output.replace_range(bytes, &replacement);

            audit.push(AuditEntry {
                entity_type: span.entity_type.clone(),
                start: span.start,
                end: span.end,
                score: span.score,
                origin: span.origin.clone(),
                original: original.to_string(),
                replacement,
            });
        }

        audit.reverse();
        Ok((output, audit))
    }
}
