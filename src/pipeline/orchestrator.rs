//! Batch orchestration
//!
//! Runs the pipeline over an ordered list of texts. Each text is an
//! independent tokio task; at most `concurrency` tasks are in flight and
//! results are slotted back by input index.

use super::engine::Pipeline;
use super::report::BatchSummary;
use super::result::PipelineResult;
use crate::audit::AuditLogger;
use crate::domain::{Result, ScrubError};
use futures::stream::{self, StreamExt};
use std::pin::pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use uuid::Uuid;

/// Output of one batch, aligned with the input by position
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub batch_id: Uuid,
    pub results: Vec<PipelineResult>,
    pub summary: BatchSummary,
}

/// Drives a shared [`Pipeline`] over batches of texts
#[derive(Debug)]
pub struct BatchOrchestrator {
    pipeline: Arc<Pipeline>,
    audit: Option<AuditLogger>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl BatchOrchestrator {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            audit: None,
            shutdown: None,
        }
    }

    /// Record every processed text in an audit log
    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Stop submitting texts once the receiver observes `true`
    ///
    /// Texts already in flight run to completion.
    pub fn with_shutdown_signal(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    /// Process a batch
    ///
    /// # Errors
    ///
    /// - [`ScrubError::Pipeline`] if a text task fails to join
    /// - [`ScrubError::Interrupted`] if the shutdown signal fired before every
    ///   text was submitted
    /// - [`ScrubError::Io`] if the audit log cannot be written
    pub async fn run(&self, texts: Vec<String>) -> Result<BatchOutput> {
        let batch_id = Uuid::new_v4();
        let total = texts.len();
        let settings = self.pipeline.settings();
        let started = Instant::now();

        crate::log_batch_start!(batch_id, total, settings.language);

        let shutdown = self.shutdown.clone();
        let tasks = stream::iter(texts.into_iter().enumerate())
            .take_while(move |_| {
                let stop = shutdown.as_ref().is_some_and(|rx| *rx.borrow());
                if stop {
                    tracing::info!("Shutdown signal received, no further texts will be submitted");
                }
                futures::future::ready(!stop)
            })
            .map(|(index, text)| {
                let pipeline = Arc::clone(&self.pipeline);
                tokio::spawn(async move {
                    let started = Instant::now();
                    let result = pipeline.process_text(&text).await;
                    (index, result, started.elapsed())
                })
            })
            .buffer_unordered(settings.concurrency);
        let mut tasks = pin!(tasks);

        let mut slots: Vec<Option<(PipelineResult, Duration)>> = vec![None; total];
        while let Some(joined) = tasks.next().await {
            let (index, result, elapsed) = joined
                .map_err(|e| ScrubError::Pipeline(format!("text task failed: {e}")))?;
            slots[index] = Some((result?, elapsed));
        }

        let completed = slots.iter().filter(|slot| slot.is_some()).count();
        if completed < total {
            tracing::warn!(
                batch_id = %batch_id,
                completed = completed,
                total = total,
                "Batch interrupted"
            );
            return Err(ScrubError::Interrupted { completed, total });
        }

        let mut summary = BatchSummary::new(batch_id.to_string());
        let mut results = Vec::with_capacity(total);

        for (index, (result, elapsed)) in slots.into_iter().flatten().enumerate() {
            summary.record(&result, elapsed);
            for fault in result.faults() {
                summary.add_warning(format!(
                    "Text {}: recognizer '{}' {} ({})",
                    index + 1,
                    fault.recognizer,
                    fault.kind,
                    fault.message
                ));
            }
            if let Some(audit) = &self.audit {
                audit
                    .log_result(batch_id, index, &result)
                    .map_err(|e| ScrubError::Io(format!("{e:#}")))?;
            }
            results.push(result);
        }

        let duration = started.elapsed();
        summary.elapsed_ms = duration.as_millis() as u64;

        crate::log_batch_complete!(batch_id, summary.texts_processed, summary.texts_skipped, duration);

        Ok(BatchOutput {
            batch_id,
            results,
            summary,
        })
    }
}
