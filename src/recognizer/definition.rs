//! Recognizer definitions
//!
//! Static, serde-deserializable descriptions of recognizers. A definition is
//! turned into a live [`Recognizer`] when the registry is built; any problem
//! at that point is a configuration fault.

use super::context::{ContextEnhancer, ContextSettings};
use super::deny_list::{DenyListRecognizer, DEFAULT_DENY_SCORE};
use super::external::ExternalRecognizer;
use super::pattern::{PatternDefinition, PatternRecognizer};
use super::predefined::{self, context_words};
use super::{Recognizer, ANY_LANGUAGE};
use crate::domain::{Result, ScrubError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

fn default_language() -> String {
    ANY_LANGUAGE.to_string()
}

fn default_deny_score() -> f32 {
    DEFAULT_DENY_SCORE
}

fn default_regions() -> Vec<String> {
    vec!["JP".to_string()]
}

/// A named recognizer with its language and kind-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizerDefinition {
    /// Unique recognizer name (used as candidate origin)
    pub name: String,

    /// Language tag the recognizer applies to (`any` for all)
    #[serde(default = "default_language")]
    pub language: String,

    /// Kind and payload
    #[serde(flatten)]
    pub kind: RecognizerKind,
}

/// Recognizer variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecognizerKind {
    /// Regex patterns for one entity type
    Pattern {
        entity: String,
        patterns: Vec<PatternDefinition>,
        #[serde(default)]
        context: Vec<String>,
    },

    /// Literal strings excluded from redaction
    DenyList {
        words: Vec<String>,
        #[serde(default = "default_deny_score")]
        score: f32,
    },

    /// Region-aware phone numbers
    Phone {
        #[serde(default = "default_regions")]
        regions: Vec<String>,
        #[serde(default)]
        context: Vec<String>,
    },

    /// Email addresses
    Email {
        #[serde(default)]
        context: Vec<String>,
    },

    /// Luhn-validated credit card numbers
    CreditCard {
        #[serde(default)]
        context: Vec<String>,
    },

    /// Reference to a detector supplied by the host application
    External { detector: String },
}

impl RecognizerKind {
    /// Keys a definition of kind `label` may carry besides `name`, `language`
    /// and `kind`; `None` for an unknown kind
    pub fn payload_keys(label: &str) -> Option<&'static [&'static str]> {
        let keys: &'static [&'static str] = match label {
            "pattern" => &["entity", "patterns", "context"],
            "deny_list" => &["words", "score"],
            "phone" => &["regions", "context"],
            "email" | "credit_card" => &["context"],
            "external" => &["detector"],
            _ => return None,
        };
        Some(keys)
    }

    /// Short label for logs and summaries
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pattern { .. } => "pattern",
            Self::DenyList { .. } => "deny_list",
            Self::Phone { .. } => "phone",
            Self::Email { .. } => "email",
            Self::CreditCard { .. } => "credit_card",
            Self::External { .. } => "external",
        }
    }
}

impl RecognizerDefinition {
    /// Create a definition
    pub fn new(name: impl Into<String>, language: impl Into<String>, kind: RecognizerKind) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            kind,
        }
    }

    /// Build the live recognizer
    ///
    /// # Errors
    ///
    /// Returns a configuration fault if the payload is invalid or an external
    /// detector is referenced but was not supplied.
    pub fn build(
        &self,
        settings: ContextSettings,
        externals: &HashMap<String, Arc<dyn Recognizer>>,
    ) -> Result<Arc<dyn Recognizer>> {
        if self.name.trim().is_empty() {
            return Err(ScrubError::Configuration(
                "recognizer name cannot be empty".to_string(),
            ));
        }
        if self.language.trim().is_empty() {
            return Err(ScrubError::invalid_recognizer(
                &self.name,
                "language cannot be empty",
            ));
        }

        let name = self.name.as_str();
        let language = self.language.as_str();

        let recognizer: Arc<dyn Recognizer> = match &self.kind {
            RecognizerKind::Pattern {
                entity,
                patterns,
                context,
            } => Arc::new(PatternRecognizer::from_definitions(
                name,
                language,
                entity,
                patterns,
                ContextEnhancer::new(context, settings),
            )?),
            RecognizerKind::DenyList { words, score } => {
                Arc::new(DenyListRecognizer::new(name, language, words, *score)?)
            }
            RecognizerKind::Phone { regions, context } => {
                let words = context_words(context, predefined::phone::DEFAULT_PHONE_CONTEXT);
                Arc::new(predefined::phone::recognizer(
                    name,
                    language,
                    regions,
                    ContextEnhancer::new(&words, settings),
                )?)
            }
            RecognizerKind::Email { context } => {
                let words = context_words(context, predefined::email::DEFAULT_EMAIL_CONTEXT);
                Arc::new(predefined::email::recognizer(
                    name,
                    language,
                    ContextEnhancer::new(&words, settings),
                )?)
            }
            RecognizerKind::CreditCard { context } => {
                let words =
                    context_words(context, predefined::credit_card::DEFAULT_CREDIT_CARD_CONTEXT);
                Arc::new(predefined::credit_card::recognizer(
                    name,
                    language,
                    ContextEnhancer::new(&words, settings),
                )?)
            }
            RecognizerKind::External { detector } => {
                let plugin = externals.get(detector).cloned().ok_or_else(|| {
                    ScrubError::invalid_recognizer(
                        name,
                        format!("external detector '{detector}' was not supplied"),
                    )
                })?;
                Arc::new(ExternalRecognizer::new(name, language, plugin))
            }
        };

        Ok(recognizer)
    }
}
