//! Configuration schema types
//!
//! Every section is optional; an empty file yields the built-in Japanese
//! recognizer set with `<ENTITY_TYPE>` tags as replacements.

use crate::anonymizer::{AnonymizationRules, RulesConfig};
use crate::recognizer::context::{DEFAULT_CONTEXT_BOOST, DEFAULT_CONTEXT_WINDOW};
use crate::recognizer::{ContextSettings, RecognizerDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Valid values for `log_level`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main Scrubber configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrubberConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Additional recognizers (after the built-in set, if enabled)
    #[serde(default)]
    pub recognizers: Vec<RecognizerDefinition>,

    /// Replacement operators
    #[serde(default)]
    pub anonymization: RulesConfig,

    /// Audit log settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScrubberConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.pipeline.validate()?;

        let mut names = HashSet::new();
        for recognizer in &self.recognizers {
            if recognizer.name.trim().is_empty() {
                return Err("recognizers: name cannot be empty".to_string());
            }
            if !names.insert(recognizer.name.as_str()) {
                return Err(format!(
                    "recognizers: duplicate recognizer name '{}'",
                    recognizer.name
                ));
            }
        }

        AnonymizationRules::from_config(&self.anonymization).map_err(|e| e.to_string())?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Batch language; only recognizers for this language (or `any`) run
    #[serde(default = "default_language")]
    pub language: String,

    /// Maximum number of texts processed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-recognizer time limit in milliseconds (0 disables the limit)
    #[serde(default = "default_recognizer_timeout_ms")]
    pub recognizer_timeout_ms: u64,

    /// Candidates scoring below this are dropped before resolution
    #[serde(default)]
    pub score_threshold: f32,

    /// Entity types to keep (empty keeps all)
    #[serde(default)]
    pub entities: Vec<String>,

    /// Load the embedded recognizer set
    #[serde(default = "default_true")]
    pub builtin_recognizers: bool,

    /// Tokens inspected on each side of a match for context words
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Score increment when a context word is found
    #[serde(default = "default_context_boost")]
    pub context_boost: f32,
}

impl PipelineConfig {
    fn validate(&self) -> Result<(), String> {
        if self.language.trim().is_empty() {
            return Err("pipeline.language cannot be empty".to_string());
        }

        if self.concurrency == 0 || self.concurrency > 256 {
            return Err(format!(
                "pipeline.concurrency must be between 1 and 256, got {}",
                self.concurrency
            ));
        }

        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(format!(
                "pipeline.score_threshold must be between 0.0 and 1.0, got {}",
                self.score_threshold
            ));
        }

        if !(0.0..=1.0).contains(&self.context_boost) {
            return Err(format!(
                "pipeline.context_boost must be between 0.0 and 1.0, got {}",
                self.context_boost
            ));
        }

        if self.entities.iter().any(|e| e.trim().is_empty()) {
            return Err("pipeline.entities cannot contain empty entries".to_string());
        }

        Ok(())
    }

    /// Per-recognizer timeout, if any
    pub fn recognizer_timeout(&self) -> Option<Duration> {
        (self.recognizer_timeout_ms > 0).then(|| Duration::from_millis(self.recognizer_timeout_ms))
    }

    /// Context settings for pattern-based recognizers
    pub fn context_settings(&self) -> ContextSettings {
        ContextSettings {
            window: self.context_window,
            boost: self.context_boost,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            concurrency: default_concurrency(),
            recognizer_timeout_ms: default_recognizer_timeout_ms(),
            score_threshold: 0.0,
            entities: Vec::new(),
            builtin_recognizers: true,
            context_window: default_context_window(),
            context_boost: default_context_boost(),
        }
    }
}

/// Audit log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Path to audit log file
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Write JSON lines (otherwise one plain-text line per text)
    #[serde(default = "default_true")]
    pub json_format: bool,
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err("audit.log_path cannot be empty when audit is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging (JSON lines)
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_language() -> String {
    "ja".to_string()
}

fn default_concurrency() -> usize {
    4
}

fn default_recognizer_timeout_ms() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_context_window() -> usize {
    DEFAULT_CONTEXT_WINDOW
}

fn default_context_boost() -> f32 {
    DEFAULT_CONTEXT_BOOST
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/scrubber_audit.log")
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymizer::OperatorConfig;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: ScrubberConfig = toml::from_str("").unwrap();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.pipeline.language, "ja");
        assert_eq!(config.pipeline.concurrency, 4);
        assert!(config.pipeline.builtin_recognizers);
        assert!(config.recognizers.is_empty());
        assert_eq!(config.anonymization.default, OperatorConfig::Tag);
        assert!(!config.audit.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pipeline_config_validation() {
        let mut config = PipelineConfig::default();
        assert!(config.validate().is_ok());

        config.concurrency = 0;
        assert!(config.validate().is_err());

        config.concurrency = 4;
        config.score_threshold = 1.5;
        assert!(config.validate().is_err());

        config.score_threshold = 0.5;
        config.context_boost = -0.1;
        assert!(config.validate().is_err());

        config.context_boost = 0.35;
        config.entities = vec![String::new()];
        assert!(config.validate().is_err());

        config.entities.clear();
        config.language = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_recognizer_timeout() {
        let mut config = PipelineConfig::default();
        assert_eq!(config.recognizer_timeout(), Some(Duration::from_secs(10)));

        config.recognizer_timeout_ms = 0;
        assert_eq!(config.recognizer_timeout(), None);
    }

    #[test]
    fn test_duplicate_recognizer_names_rejected() {
        let config: ScrubberConfig = toml::from_str(
            r#"
            [[recognizers]]
            name = "mail"
            kind = "email"

            [[recognizers]]
            name = "mail"
            kind = "email"
            "#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.contains("duplicate"));
    }

    #[test]
    fn test_invalid_rule_rejected() {
        let config: ScrubberConfig = toml::from_str(
            r#"
            [anonymization.rules.PHONE_NUMBER]
            type = "mask"
            chars_to_mask = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
