//! Domain error types
//!
//! This module defines the error hierarchy for Scrubber. Errors carry plain
//! string payloads and don't expose third-party types.

use thiserror::Error;

/// Main Scrubber error type
///
/// Per-recognizer faults are not represented here: they are recovered at the
/// recognizer boundary and recorded on the pipeline result instead.
#[derive(Debug, Error)]
pub enum ScrubError {
    /// Configuration-related errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A recognizer definition could not be turned into a recognizer
    #[error("Invalid recognizer '{name}': {reason}")]
    InvalidRecognizer { name: String, reason: String },

    /// An anonymization rule is malformed
    #[error("Invalid anonymization rule for '{entity_type}': {reason}")]
    InvalidRule { entity_type: String, reason: String },

    /// A span does not fit the text it is applied to
    #[error("Span [{start}, {end}) out of bounds for text of {len} characters")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },

    /// Batch execution errors (task failures)
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// A shutdown signal stopped the batch before every text was submitted
    #[error("Batch interrupted after {completed} of {total} texts")]
    Interrupted { completed: usize, total: usize },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl ScrubError {
    /// Shorthand for an invalid recognizer definition
    pub fn invalid_recognizer(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRecognizer {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error should stop the process before any text is handled
    pub fn is_configuration_fault(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::InvalidRecognizer { .. } | Self::InvalidRule { .. }
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ScrubError {
    fn from(err: std::io::Error) -> Self {
        ScrubError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ScrubError {
    fn from(err: serde_json::Error) -> Self {
        ScrubError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ScrubError {
    fn from(err: toml::de::Error) -> Self {
        ScrubError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrub_error_display() {
        let err = ScrubError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_invalid_recognizer_display() {
        let err = ScrubError::invalid_recognizer("ja_currency", "bad regex");
        assert_eq!(err.to_string(), "Invalid recognizer 'ja_currency': bad regex");
        assert!(err.is_configuration_fault());
    }

    #[test]
    fn test_span_out_of_bounds_is_not_configuration_fault() {
        let err = ScrubError::SpanOutOfBounds {
            start: 3,
            end: 9,
            len: 5,
        };
        assert!(!err.is_configuration_fault());
        assert!(err.to_string().contains("[3, 9)"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ScrubError = io_err.into();
        assert!(matches!(err, ScrubError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ScrubError = json_err.into();
        assert!(matches!(err, ScrubError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ScrubError = toml_err.into();
        assert!(matches!(err, ScrubError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
