//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console logs on stderr
//! - Configurable log levels (overridable through `RUST_LOG`)
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use scrubber::logging::init_logging;
//! use scrubber::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a batch
///
/// # Example
///
/// ```no_run
/// use scrubber::log_batch_start;
///
/// log_batch_start!("3f1c", 120, "ja");
/// ```
#[macro_export]
macro_rules! log_batch_start {
    ($batch_id:expr, $texts:expr, $language:expr) => {
        tracing::info!(
            batch_id = %$batch_id,
            texts = $texts,
            language = %$language,
            "Starting batch"
        );
    };
}

/// Log the completion of a batch
///
/// # Example
///
/// ```no_run
/// use scrubber::log_batch_complete;
/// use std::time::Duration;
///
/// log_batch_complete!("3f1c", 118, 2, Duration::from_millis(840));
/// ```
#[macro_export]
macro_rules! log_batch_complete {
    ($batch_id:expr, $processed:expr, $skipped:expr, $duration:expr) => {
        tracing::info!(
            batch_id = %$batch_id,
            processed = $processed,
            skipped = $skipped,
            duration_ms = $duration.as_millis() as u64,
            "Batch completed"
        );
    };
}

/// Log a recovered recognizer fault
///
/// # Example
///
/// ```no_run
/// use scrubber::log_recognizer_fault;
///
/// log_recognizer_fault!("ginza", "timeout", "timed out after 500 ms");
/// ```
#[macro_export]
macro_rules! log_recognizer_fault {
    ($recognizer:expr, $kind:expr, $message:expr) => {
        tracing::warn!(
            recognizer = %$recognizer,
            kind = %$kind,
            message = %$message,
            "Recognizer fault, continuing without its candidates"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use scrubber::log_error_with_context;
/// use scrubber::domain::ScrubError;
///
/// let error = ScrubError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
