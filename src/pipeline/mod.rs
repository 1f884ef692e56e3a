//! Detection-and-redaction pipeline
//!
//! - [`engine`] - per-text pipeline: recognizers, filters, resolver, rewriter
//! - [`orchestrator`] - bounded-concurrency batch driver
//! - [`report`] - batch summary
//! - [`result`] - per-text outcome and recognizer faults

pub mod engine;
pub mod orchestrator;
pub mod report;
pub mod result;

pub use engine::{Pipeline, PipelineSettings};
pub use orchestrator::{BatchOrchestrator, BatchOutput};
pub use report::BatchSummary;
pub use result::{FaultKind, PipelineResult, RecognizerFault};
