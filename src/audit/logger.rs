//! Audit logger for redaction batches

use crate::anonymizer::{hash_value, AuditEntry};
use crate::pipeline::PipelineResult;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Audit log entry, one per processed text
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    batch_id: String,
    text_index: usize,
    detections_count: usize,
    faults_count: usize,
    detections: Vec<AuditDetection>,
}

/// Audit detection entry (with hashed original value)
#[derive(Debug, Serialize)]
struct AuditDetection {
    entity_type: String,
    start: usize,
    end: usize,
    score: f32,
    origin: String,
    /// SHA-256 hash of original value (never log plaintext PII)
    value_hash: String,
}

impl From<&AuditEntry> for AuditDetection {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            entity_type: entry.entity_type.clone(),
            start: entry.start,
            end: entry.end,
            score: entry.score,
            origin: entry.origin.clone(),
            value_hash: hash_value(&entry.original),
        }
    }
}

/// Audit logger for redaction operations
#[derive(Debug)]
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log the outcome of one text; skipped texts are not recorded
    pub fn log_result(&self, batch_id: Uuid, text_index: usize, result: &PipelineResult) -> Result<()> {
        if !self.enabled || result.is_skipped() {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            batch_id: batch_id.to_string(),
            text_index,
            detections_count: result.audit().len(),
            faults_count: result.faults().len(),
            detections: result.audit().iter().map(AuditDetection::from).collect(),
        };

        self.write_entry(&entry)
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            let entities: Vec<&str> = entry
                .detections
                .iter()
                .map(|d| d.entity_type.as_str())
                .collect();
            writeln!(
                file,
                "[{}] Batch: {} | Text: {} | Detections: {} [{}] | Faults: {}",
                entry.timestamp,
                entry.batch_id,
                entry.text_index,
                entry.detections_count,
                entities.join(", "),
                entry.faults_count
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}
