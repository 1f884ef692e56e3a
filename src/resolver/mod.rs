//! Conflict resolution
//!
//! Turns the union of candidates from every recognizer into one disjoint,
//! deterministic set of spans:
//!
//! 1. `DENY` candidates veto every candidate they overlap, whatever its score.
//! 2. The remaining candidates are ranked by score (descending), then start,
//!    origin, end and entity type (ascending).
//! 3. Candidates are accepted greedily in rank order unless they overlap an
//!    already accepted span.
//!
//! The result never contains `DENY` spans and is sorted by `start`.

use crate::domain::{spans_overlap, Candidate, CharIndex, ResolvedSpan, ResolvedSpans};
use std::cmp::Ordering;

/// Rank order used for greedy acceptance
fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.origin.cmp(&b.origin))
        .then_with(|| a.end.cmp(&b.end))
        .then_with(|| a.entity_type.cmp(&b.entity_type))
}

/// Greedy score-priority resolver with deny-list veto
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver;

impl ConflictResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `candidates` found in `text`
    ///
    /// Candidates that do not fit the text are ignored before ranking, so
    /// they neither veto nor block any other candidate.
    pub fn resolve(&self, candidates: Vec<Candidate>, text: &str) -> ResolvedSpans {
        let index = CharIndex::new(text);
        self.resolve_indexed(candidates, &index)
    }

    /// Resolve against a prebuilt character index
    pub fn resolve_indexed(&self, candidates: Vec<Candidate>, index: &CharIndex<'_>) -> ResolvedSpans {
        let char_len = index.char_len();
        let (deny, mut others): (Vec<Candidate>, Vec<Candidate>) = candidates
            .into_iter()
            .filter(|candidate| candidate.is_valid_for(char_len))
            .partition(Candidate::is_deny);

        let before_veto = others.len();
        others.retain(|candidate| !deny.iter().any(|d| d.overlaps(candidate)));
        let vetoed = before_veto - others.len();

        others.sort_by(rank);

        let mut accepted: Vec<Candidate> = Vec::with_capacity(others.len());
        for candidate in others {
            let collides = accepted
                .iter()
                .any(|a| spans_overlap(a.start, a.end, candidate.start, candidate.end));
            if !collides {
                accepted.push(candidate);
            }
        }

        accepted.sort_by_key(|c| c.start);

        let spans: Vec<ResolvedSpan> = accepted
            .into_iter()
            .filter_map(|candidate| {
                let text = index.slice(candidate.start..candidate.end)?.to_string();
                Some(ResolvedSpan::from_candidate(candidate, text))
            })
            .collect();

        tracing::trace!(
            deny = deny.len(),
            vetoed = vetoed,
            resolved = spans.len(),
            "Resolved candidates"
        );

        ResolvedSpans::from_sorted(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DENY_ENTITY;

    fn candidate(entity: &str, start: usize, end: usize, score: f32, origin: &str) -> Candidate {
        Candidate::new(entity, start, end, score, origin)
    }

    fn summary(spans: &ResolvedSpans) -> Vec<(String, usize, usize, String)> {
        spans
            .iter()
            .map(|s| (s.entity_type.clone(), s.start, s.end, s.origin.clone()))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let spans = ConflictResolver::new().resolve(vec![], "text");
        assert!(spans.is_empty());
    }

    #[test]
    fn test_higher_score_wins_overlap() {
        let text = "0123456789";
        let spans = ConflictResolver::new().resolve(
            vec![
                candidate("A", 0, 5, 0.4, "a"),
                candidate("B", 3, 8, 0.9, "b"),
            ],
            text,
        );

        assert_eq!(summary(&spans), vec![("B".to_string(), 3, 8, "b".to_string())]);
        assert_eq!(spans.as_slice()[0].text, "34567");
    }

    #[test]
    fn test_equal_score_earlier_start_wins() {
        let spans = ConflictResolver::new().resolve(
            vec![
                candidate("B", 2, 6, 0.5, "a"),
                candidate("A", 0, 4, 0.5, "b"),
            ],
            "0123456789",
        );
        assert_eq!(spans.as_slice()[0].entity_type, "A");
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_identical_span_resolved_by_origin() {
        let spans = ConflictResolver::new().resolve(
            vec![
                candidate("PHONE_NUMBER", 0, 4, 0.6, "zeta"),
                candidate("JA_INT_PHONE", 0, 4, 0.6, "alpha"),
            ],
            "1234",
        );
        assert_eq!(spans.len(), 1);
        assert_eq!(spans.as_slice()[0].origin, "alpha");
    }

    #[test]
    fn test_deny_vetoes_regardless_of_score() {
        let text = "VISA/4444-5555-6666-7777";
        let spans = ConflictResolver::new().resolve(
            vec![
                candidate("CREDIT_CARD", 5, 24, 1.0, "credit_card"),
                candidate(DENY_ENTITY, 0, 24, 0.1, "deny words"),
            ],
            text,
        );
        assert!(spans.is_empty());
    }

    #[test]
    fn test_deny_only_vetoes_overlapping() {
        let text = "松本物産 1,000円";
        let spans = ConflictResolver::new().resolve(
            vec![
                candidate(DENY_ENTITY, 0, 4, 0.9, "deny words"),
                candidate("JA_CURRENCY", 5, 10, 0.4, "ja_currency"),
            ],
            text,
        );
        assert_eq!(summary(&spans), vec![("JA_CURRENCY".to_string(), 5, 10, "ja_currency".to_string())]);
        assert_eq!(spans.as_slice()[0].text, "1,000");
    }

    #[test]
    fn test_adjacent_spans_do_not_conflict() {
        let spans = ConflictResolver::new().resolve(
            vec![candidate("B", 3, 6, 0.5, "b"), candidate("A", 0, 3, 0.5, "a")],
            "abcdef",
        );
        assert_eq!(spans.len(), 2);
        assert_eq!(spans.as_slice()[0].start, 0);
        assert_eq!(spans.as_slice()[1].start, 3);
    }

    #[test]
    fn test_output_is_disjoint_and_sorted() {
        let candidates = vec![
            candidate("A", 0, 3, 0.3, "r1"),
            candidate("B", 2, 5, 0.7, "r2"),
            candidate("C", 4, 9, 0.5, "r3"),
            candidate("D", 8, 12, 0.9, "r4"),
            candidate("E", 12, 14, 0.1, "r5"),
            candidate("F", 0, 14, 0.2, "r6"),
        ];
        let spans = ConflictResolver::new().resolve(candidates, "abcdefghijklmn");

        assert_eq!(
            summary(&spans)
                .into_iter()
                .map(|(e, ..)| e)
                .collect::<Vec<_>>(),
            vec!["B", "D", "E"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
        for pair in spans.as_slice().windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn test_deterministic_under_permutation() {
        let base = vec![
            candidate("A", 0, 4, 0.5, "r1"),
            candidate("B", 0, 4, 0.5, "r2"),
            candidate("C", 2, 6, 0.5, "r3"),
            candidate(DENY_ENTITY, 10, 12, 0.9, "deny"),
            candidate("D", 11, 13, 1.0, "r4"),
            candidate("E", 6, 9, 0.8, "r5"),
        ];
        let text = "abcdefghijklmnop";
        let expected = ConflictResolver::new().resolve(base.clone(), text);

        let mut reversed = base.clone();
        reversed.reverse();
        assert_eq!(ConflictResolver::new().resolve(reversed, text), expected);

        let mut rotated = base;
        rotated.rotate_left(2);
        assert_eq!(ConflictResolver::new().resolve(rotated, text), expected);
    }

    #[test]
    fn test_multibyte_text_capture() {
        let text = "お問い合わせは内線:1234まで";
        let spans = ConflictResolver::new().resolve(
            vec![candidate("JA_INT_PHONE", 10, 14, 0.75, "ja_internal_phone_number")],
            text,
        );
        assert_eq!(spans.as_slice()[0].text, "1234");
    }

    #[test]
    fn test_out_of_range_candidate_does_not_block() {
        let text = "0123456789";
        let spans = ConflictResolver::new().resolve(
            vec![
                candidate("BOGUS", 5, 40, 0.99, "broken"),
                candidate("B", 3, 8, 0.6, "b"),
            ],
            text,
        );

        assert_eq!(summary(&spans), vec![("B".to_string(), 3, 8, "b".to_string())]);
    }

    #[test]
    fn test_invalid_deny_does_not_veto() {
        let text = "0123456789";
        let spans = ConflictResolver::new().resolve(
            vec![
                candidate(DENY_ENTITY, 4, 4, 1.0, "deny"),
                candidate("A", 0, 6, 0.5, "a"),
                candidate("C", 7, 9, f32::NAN, "c"),
            ],
            text,
        );

        assert_eq!(summary(&spans), vec![("A".to_string(), 0, 6, "a".to_string())]);
    }
}
