//! Span and candidate model
//!
//! All offsets are half-open character intervals `[start, end)` over the
//! original text.

use serde::{Deserialize, Serialize};

/// Reserved entity type produced by deny-list recognizers.
///
/// Candidates of this type veto every overlapping candidate and are never
/// redacted themselves.
pub const DENY_ENTITY: &str = "DENY";

/// An unconfirmed detection produced by a recognizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Entity type label (e.g. `PHONE_NUMBER`, `JA_CURRENCY`, `DENY`)
    pub entity_type: String,
    /// Start character offset (inclusive)
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
    /// Confidence score (0.0 - 1.0)
    pub score: f32,
    /// Name of the recognizer that produced this candidate
    pub origin: String,
}

impl Candidate {
    /// Create a new candidate; the score is clamped to `[0.0, 1.0]`
    pub fn new(
        entity_type: impl Into<String>,
        start: usize,
        end: usize,
        score: f32,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            start,
            end,
            score: score.clamp(0.0, 1.0),
            origin: origin.into(),
        }
    }

    /// Length of the span in characters
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is a deny-list veto candidate
    pub fn is_deny(&self) -> bool {
        self.entity_type == DENY_ENTITY
    }

    /// Whether two spans share at least one character position
    pub fn overlaps(&self, other: &Candidate) -> bool {
        spans_overlap(self.start, self.end, other.start, other.end)
    }

    /// Check the span/score invariants against a text of `char_len` characters
    pub fn is_valid_for(&self, char_len: usize) -> bool {
        self.start < self.end
            && self.end <= char_len
            && self.score.is_finite()
            && (0.0..=1.0).contains(&self.score)
    }
}

/// Half-open interval overlap test
pub fn spans_overlap(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> bool {
    a_start < b_end && b_start < a_end
}

/// A candidate promoted to final status by the resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSpan {
    /// Entity type label
    pub entity_type: String,
    /// Start character offset (inclusive)
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
    /// Confidence score (0.0 - 1.0)
    pub score: f32,
    /// Recognizer that produced the winning candidate
    pub origin: String,
    /// Original substring covered by the span
    pub text: String,
}

impl ResolvedSpan {
    pub(crate) fn from_candidate(candidate: Candidate, text: String) -> Self {
        Self {
            entity_type: candidate.entity_type,
            start: candidate.start,
            end: candidate.end,
            score: candidate.score,
            origin: candidate.origin,
            text,
        }
    }
}

/// The resolver's output: pairwise disjoint spans sorted by `start`
///
/// Only the resolver can build this type, so holding one is proof that the
/// ordering and disjointness invariants hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedSpans {
    spans: Vec<ResolvedSpan>,
}

impl ResolvedSpans {
    /// Wrap spans that are already sorted and disjoint
    pub(crate) fn from_sorted(spans: Vec<ResolvedSpan>) -> Self {
        debug_assert!(spans
            .windows(2)
            .all(|pair| pair[0].end <= pair[1].start));
        Self { spans }
    }

    /// Spans in ascending `start` order
    pub fn as_slice(&self) -> &[ResolvedSpan] {
        &self.spans
    }

    /// Iterate spans in ascending `start` order
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedSpan> {
        self.spans.iter()
    }

    /// Number of resolved spans
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether nothing was resolved
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResolvedSpans {
    type Item = &'a ResolvedSpan;
    type IntoIter = std::slice::Iter<'a, ResolvedSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}
