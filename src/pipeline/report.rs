//! Batch summary reporting
//!
//! Aggregates detection statistics over a batch for console or JSON output.

use super::result::PipelineResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Summary of one batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Batch identifier
    pub batch_id: String,

    /// Input texts
    pub total_texts: usize,

    /// Texts that were scanned and rewritten
    pub texts_processed: usize,

    /// Empty or whitespace-only texts
    pub texts_skipped: usize,

    /// Processed texts with at least one redaction
    pub texts_with_detections: usize,

    /// Redacted spans over the whole batch
    pub total_detections: usize,

    /// Redacted spans by entity type
    pub detections_by_entity: BTreeMap<String, usize>,

    /// Recognizer faults by recognizer name
    pub faults_by_recognizer: BTreeMap<String, usize>,

    /// One line per recognizer fault, in input order
    pub warnings: Vec<String>,

    /// Sum of per-text processing times (ms)
    pub total_processing_time_ms: u64,

    /// Wall-clock time of the batch (ms)
    pub elapsed_ms: u64,
}

impl BatchSummary {
    /// Create an empty summary
    pub fn new(batch_id: impl Into<String>) -> Self {
        Self {
            batch_id: batch_id.into(),
            ..Self::default()
        }
    }

    /// Add the result of one text
    pub fn record(&mut self, result: &PipelineResult, processing_time: Duration) {
        self.total_texts += 1;

        if result.is_skipped() {
            self.texts_skipped += 1;
            return;
        }

        self.texts_processed += 1;
        self.total_processing_time_ms += processing_time.as_millis() as u64;

        let audit = result.audit();
        if !audit.is_empty() {
            self.texts_with_detections += 1;
            self.total_detections += audit.len();
            for entry in audit {
                *self
                    .detections_by_entity
                    .entry(entry.entity_type.clone())
                    .or_insert(0) += 1;
            }
        }

        for fault in result.faults() {
            *self
                .faults_by_recognizer
                .entry(fault.recognizer.clone())
                .or_insert(0) += 1;
        }
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Total recognizer faults
    pub fn total_faults(&self) -> usize {
        self.faults_by_recognizer.values().sum()
    }

    /// Average processing time per processed text (ms)
    pub fn avg_processing_time_ms(&self) -> u64 {
        if self.texts_processed == 0 {
            0
        } else {
            self.total_processing_time_ms / self.texts_processed as u64
        }
    }

    /// Format summary for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                    REDACTION BATCH SUMMARY                    \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Batch ID:                    {}\n", self.batch_id));
        output.push_str(&format!("  Texts Total:                 {}\n", self.total_texts));
        output.push_str(&format!("  Texts Processed:             {}\n", self.texts_processed));
        output.push_str(&format!("  Texts Skipped:               {}\n", self.texts_skipped));
        output.push_str(&format!(
            "  Texts with Detections:       {}\n",
            self.texts_with_detections
        ));
        output.push_str(&format!("  Total Detections:            {}\n", self.total_detections));
        output.push_str(&format!(
            "  Avg Processing Time:         {} ms\n",
            self.avg_processing_time_ms()
        ));
        output.push_str(&format!("  Elapsed:                     {} ms\n", self.elapsed_ms));
        output.push('\n');

        if !self.detections_by_entity.is_empty() {
            output.push_str("🔍 DETECTIONS BY ENTITY TYPE\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut entities: Vec<_> = self.detections_by_entity.iter().collect();
            entities.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            for (entity, count) in entities {
                output.push_str(&format!("  {:30} {:>5}\n", entity, count));
            }
            output.push('\n');
        }

        if !self.faults_by_recognizer.is_empty() {
            output.push_str("⚠️  RECOGNIZER FAULTS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for (recognizer, count) in &self.faults_by_recognizer {
                output.push_str(&format!("  {:30} {:>5}\n", recognizer, count));
            }
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("⚠️  WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  • {}\n", warning));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");

        output
    }

    /// Format summary as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymizer::AuditEntry;
    use crate::pipeline::{FaultKind, RecognizerFault};

    fn entry(entity_type: &str) -> AuditEntry {
        AuditEntry {
            entity_type: entity_type.to_string(),
            start: 0,
            end: 3,
            score: 0.75,
            origin: "test".to_string(),
            original: "500".to_string(),
            replacement: format!("<{entity_type}>"),
        }
    }

    #[test]
    fn test_new_summary_is_empty() {
        let summary = BatchSummary::new("batch-1");
        assert_eq!(summary.batch_id, "batch-1");
        assert_eq!(summary.total_texts, 0);
        assert_eq!(summary.avg_processing_time_ms(), 0);
        assert_eq!(summary.total_faults(), 0);
    }

    #[test]
    fn test_record_counts() {
        let mut summary = BatchSummary::new("batch-1");
        summary.record(&PipelineResult::Skipped, Duration::ZERO);
        summary.record(
            &PipelineResult::Redacted {
                text: "<JA_CURRENCY>円".to_string(),
                audit: vec![entry("JA_CURRENCY"), entry("JA_INT_PHONE")],
                faults: vec![RecognizerFault::new("ner", FaultKind::Timeout, "slow")],
            },
            Duration::from_millis(20),
        );
        summary.record(
            &PipelineResult::Redacted {
                text: "nothing here".to_string(),
                audit: vec![],
                faults: vec![],
            },
            Duration::from_millis(10),
        );

        assert_eq!(summary.total_texts, 3);
        assert_eq!(summary.texts_skipped, 1);
        assert_eq!(summary.texts_processed, 2);
        assert_eq!(summary.texts_with_detections, 1);
        assert_eq!(summary.total_detections, 2);
        assert_eq!(summary.detections_by_entity.get("JA_CURRENCY"), Some(&1));
        assert_eq!(summary.total_faults(), 1);
        assert_eq!(summary.avg_processing_time_ms(), 15);
    }

    #[test]
    fn test_format_console() {
        let mut summary = BatchSummary::new("batch-1");
        summary.record(
            &PipelineResult::Redacted {
                text: "<JA_CURRENCY>円".to_string(),
                audit: vec![entry("JA_CURRENCY")],
                faults: vec![],
            },
            Duration::from_millis(5),
        );
        summary.add_warning("example warning".to_string());

        let output = summary.format_console();
        assert!(output.contains("REDACTION BATCH SUMMARY"));
        assert!(output.contains("JA_CURRENCY"));
        assert!(output.contains("example warning"));
    }

    #[test]
    fn test_format_json() {
        let summary = BatchSummary::new("batch-1");
        let json = summary.format_json().unwrap();
        assert!(json.contains("\"batch_id\": \"batch-1\""));
    }
}
