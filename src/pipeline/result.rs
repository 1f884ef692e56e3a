//! Per-text pipeline results

use crate::anonymizer::AuditEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a recognizer invocation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// `scan` returned an error
    Error,
    /// `scan` exceeded the configured time limit
    Timeout,
    /// `scan` panicked
    Panic,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Error => "error",
            Self::Timeout => "timeout",
            Self::Panic => "panic",
        };
        f.write_str(label)
    }
}

/// A recognizer failure recovered at the invocation boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizerFault {
    pub recognizer: String,
    pub kind: FaultKind,
    pub message: String,
}

impl RecognizerFault {
    pub fn new(recognizer: impl Into<String>, kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            recognizer: recognizer.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Outcome for one input text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineResult {
    /// Input was empty or whitespace-only; nothing ran
    Skipped,
    /// Input was scanned and rewritten (possibly with no spans)
    Redacted {
        text: String,
        audit: Vec<AuditEntry>,
        faults: Vec<RecognizerFault>,
    },
}

impl PipelineResult {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Redacted text, if the input was processed
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Skipped => None,
            Self::Redacted { text, .. } => Some(text),
        }
    }

    /// Audit entries in ascending offset order (empty when skipped)
    pub fn audit(&self) -> &[AuditEntry] {
        match self {
            Self::Skipped => &[],
            Self::Redacted { audit, .. } => audit,
        }
    }

    /// Recognizer faults recorded while scanning (empty when skipped)
    pub fn faults(&self) -> &[RecognizerFault] {
        match self {
            Self::Skipped => &[],
            Self::Redacted { faults, .. } => faults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_accessors() {
        let result = PipelineResult::Skipped;
        assert!(result.is_skipped());
        assert_eq!(result.text(), None);
        assert!(result.audit().is_empty());
        assert!(result.faults().is_empty());
    }

    #[test]
    fn test_serialization_tags_status() {
        let result = PipelineResult::Redacted {
            text: "<JA_CURRENCY>円".to_string(),
            audit: vec![],
            faults: vec![RecognizerFault::new("ner", FaultKind::Timeout, "slow")],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "redacted");
        assert_eq!(json["faults"][0]["kind"], "timeout");

        let skipped = serde_json::to_value(PipelineResult::Skipped).unwrap();
        assert_eq!(skipped["status"], "skipped");
    }

    #[test]
    fn test_fault_kind_display() {
        assert_eq!(FaultKind::Panic.to_string(), "panic");
    }
}
