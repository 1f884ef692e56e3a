//! Main redaction pipeline
//!
//! This module provides the [`Pipeline`] that runs recognizers over one text,
//! resolves their candidates and rewrites the text.
//!
//! # Architecture
//!
//! The pipeline coordinates three components:
//! - **Registry**: immutable set of recognizers, run concurrently per text
//! - **Resolver**: deny-list veto and greedy score-priority overlap resolution
//! - **Rewriter**: per-entity operators spliced in at character offsets
//!
//! # Examples
//!
//! ```no_run
//! use scrubber::config::ScrubberConfig;
//! use scrubber::pipeline::Pipeline;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pipeline = Pipeline::from_config(&ScrubberConfig::default())?;
//!
//! let result = pipeline.process_text("お問い合わせは内線:1234まで").await?;
//! assert_eq!(result.text(), Some("お問い合わせは内線:<JA_INT_PHONE>まで"));
//! # Ok(())
//! # }
//! ```

use super::result::{FaultKind, PipelineResult, RecognizerFault};
use crate::anonymizer::{AnonymizationRules, Rewriter};
use crate::config::{PipelineConfig, ScrubberConfig};
use crate::domain::{Candidate, CharIndex, Result, ScrubError};
use crate::recognizer::registry::builtin_definitions;
use crate::recognizer::{Recognizer, RecognizerRegistry};
use crate::resolver::ConflictResolver;
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

/// Runtime pipeline settings
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Batch language
    pub language: String,
    /// Maximum number of texts processed at the same time
    pub concurrency: usize,
    /// Per-recognizer time limit
    pub recognizer_timeout: Option<Duration>,
    /// Non-DENY candidates scoring below this are dropped
    pub score_threshold: f32,
    /// Non-DENY entity types to keep (empty keeps all)
    pub entities: Vec<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for PipelineSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            language: config.language.clone(),
            concurrency: config.concurrency,
            recognizer_timeout: config.recognizer_timeout(),
            score_threshold: config.score_threshold,
            entities: config.entities.clone(),
        }
    }
}

/// Detection-and-redaction pipeline
///
/// Holds only immutable state and is shared across tasks behind an `Arc`.
#[derive(Debug)]
pub struct Pipeline {
    registry: RecognizerRegistry,
    resolver: ConflictResolver,
    rewriter: Rewriter,
    settings: PipelineSettings,
}

impl Pipeline {
    /// Create a pipeline
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the settings are out of range.
    pub fn new(
        registry: RecognizerRegistry,
        rules: AnonymizationRules,
        settings: PipelineSettings,
    ) -> Result<Self> {
        if settings.concurrency == 0 {
            return Err(ScrubError::Configuration(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&settings.score_threshold) {
            return Err(ScrubError::Configuration(format!(
                "score threshold {} is outside [0.0, 1.0]",
                settings.score_threshold
            )));
        }

        tracing::debug!(
            recognizers = ?registry.names(),
            language = %settings.language,
            "Pipeline created"
        );

        Ok(Self {
            registry,
            resolver: ConflictResolver::new(),
            rewriter: Rewriter::new(rules),
            settings,
        })
    }

    /// Build the pipeline described by a configuration
    pub fn from_config(config: &ScrubberConfig) -> Result<Self> {
        Self::from_config_with_externals(config, Vec::new())
    }

    /// Build the pipeline, supplying detectors for `external` recognizer definitions
    ///
    /// # Errors
    ///
    /// Any invalid recognizer definition, unknown external detector, duplicate
    /// recognizer name or invalid rule is a configuration fault.
    pub fn from_config_with_externals(
        config: &ScrubberConfig,
        externals: impl IntoIterator<Item = (String, Arc<dyn Recognizer>)>,
    ) -> Result<Self> {
        let mut builder =
            RecognizerRegistry::builder().context_settings(config.pipeline.context_settings());

        if config.pipeline.builtin_recognizers {
            builder = builder.definitions(builtin_definitions()?);
        }
        builder = builder.definitions(config.recognizers.iter().cloned());
        for (detector, recognizer) in externals {
            builder = builder.external(detector, recognizer);
        }

        let registry = builder.build()?;
        let rules = AnonymizationRules::from_config(&config.anonymization)?;

        Self::new(registry, rules, PipelineSettings::from(&config.pipeline))
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn registry(&self) -> &RecognizerRegistry {
        &self.registry
    }

    /// Process one text in the configured language
    pub async fn process_text(&self, text: &str) -> Result<PipelineResult> {
        self.process_text_with_language(text, &self.settings.language)
            .await
    }

    /// Process one text
    ///
    /// Empty and whitespace-only texts are skipped without running any
    /// recognizer.
    pub async fn process_text_with_language(
        &self,
        text: &str,
        language: &str,
    ) -> Result<PipelineResult> {
        if text.trim().is_empty() {
            return Ok(PipelineResult::Skipped);
        }

        let index = CharIndex::new(text);
        let (candidates, faults) = self.analyze_indexed(&index, language).await;
        let spans = self.resolver.resolve_indexed(candidates, &index);
        let (redacted, audit) = self.rewriter.rewrite(text, &spans)?;

        Ok(PipelineResult::Redacted {
            text: redacted,
            audit,
            faults,
        })
    }

    /// Run every applicable recognizer and collect filtered candidates
    pub async fn analyze(&self, text: &str, language: &str) -> (Vec<Candidate>, Vec<RecognizerFault>) {
        let index = CharIndex::new(text);
        self.analyze_indexed(&index, language).await
    }

    async fn analyze_indexed(
        &self,
        index: &CharIndex<'_>,
        language: &str,
    ) -> (Vec<Candidate>, Vec<RecognizerFault>) {
        let text = index.text();
        let char_len = index.char_len();
        let recognizers = self.registry.for_language(language);

        let outcomes = join_all(recognizers.iter().map(|recognizer| {
            invoke(
                recognizer.as_ref(),
                text,
                language,
                self.settings.recognizer_timeout,
            )
        }))
        .await;

        let mut candidates = Vec::new();
        let mut faults = Vec::new();

        for (recognizer, outcome) in recognizers.iter().zip(outcomes) {
            match outcome {
                Ok(found) => {
                    for candidate in found {
                        if !candidate.is_valid_for(char_len) {
                            tracing::warn!(
                                recognizer = recognizer.name(),
                                start = candidate.start,
                                end = candidate.end,
                                score = candidate.score,
                                "Dropping candidate that does not fit the text"
                            );
                            continue;
                        }
                        if self.keep(&candidate) {
                            candidates.push(candidate);
                        }
                    }
                }
                Err(fault) => {
                    crate::log_recognizer_fault!(fault.recognizer, fault.kind, fault.message);
                    faults.push(fault);
                }
            }
        }

        (candidates, faults)
    }

    /// Score threshold and entity allow-list; DENY candidates always pass
    fn keep(&self, candidate: &Candidate) -> bool {
        if candidate.is_deny() {
            return true;
        }
        candidate.score >= self.settings.score_threshold
            && (self.settings.entities.is_empty()
                || self.settings.entities.contains(&candidate.entity_type))
    }
}

/// Run one recognizer, converting errors, panics and timeouts into faults
async fn invoke(
    recognizer: &dyn Recognizer,
    text: &str,
    language: &str,
    limit: Option<Duration>,
) -> std::result::Result<Vec<Candidate>, RecognizerFault> {
    let name = recognizer.name();
    let scan = AssertUnwindSafe(recognizer.scan(text, language)).catch_unwind();

    let outcome = match limit {
        Some(limit) => match tokio::time::timeout(limit, scan).await {
            Ok(outcome) => outcome,
            Err(_) => {
                return Err(RecognizerFault::new(
                    name,
                    FaultKind::Timeout,
                    format!("timed out after {} ms", limit.as_millis()),
                ))
            }
        },
        None => scan.await,
    };

    match outcome {
        Ok(Ok(candidates)) => Ok(candidates),
        Ok(Err(e)) => Err(RecognizerFault::new(name, FaultKind::Error, format!("{e:#}"))),
        Err(payload) => Err(RecognizerFault::new(
            name,
            FaultKind::Panic,
            panic_message(payload.as_ref()),
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "recognizer panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::{RecognizerDefinition, RecognizerKind};
    use async_trait::async_trait;

    struct StubRecognizer {
        name: String,
        entities: Vec<String>,
        candidates: Vec<Candidate>,
    }

    #[async_trait]
    impl Recognizer for StubRecognizer {
        fn name(&self) -> &str {
            &self.name
        }

        fn supported_language(&self) -> &str {
            "ja"
        }

        fn supported_entities(&self) -> &[String] {
            &self.entities
        }

        async fn scan(&self, _text: &str, _language: &str) -> anyhow::Result<Vec<Candidate>> {
            Ok(self.candidates.clone())
        }
    }

    fn stub(name: &str, candidates: Vec<Candidate>) -> Arc<dyn Recognizer> {
        Arc::new(StubRecognizer {
            name: name.to_string(),
            entities: vec!["PERSON".to_string()],
            candidates,
        })
    }

    fn pipeline_with(recognizers: Vec<Arc<dyn Recognizer>>, settings: PipelineSettings) -> Pipeline {
        let registry = recognizers
            .into_iter()
            .fold(RecognizerRegistry::builder(), |b, r| b.recognizer(r))
            .build()
            .unwrap();
        Pipeline::new(registry, AnonymizationRules::default(), settings).unwrap()
    }

    #[tokio::test]
    async fn test_builtin_pipeline_redacts_extension() {
        let pipeline = Pipeline::from_config(&ScrubberConfig::default()).unwrap();
        let result = pipeline
            .process_text("お問い合わせは内線:1234まで")
            .await
            .unwrap();

        assert_eq!(result.text(), Some("お問い合わせは内線:<JA_INT_PHONE>まで"));
        assert_eq!(result.audit().len(), 1);
        assert_eq!(result.audit()[0].original, "1234");
        assert!((result.audit()[0].score - 0.75).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_whitespace_is_skipped() {
        let pipeline = Pipeline::from_config(&ScrubberConfig::default()).unwrap();
        assert!(pipeline.process_text("").await.unwrap().is_skipped());
        assert!(pipeline.process_text(" \t\u{3000}").await.unwrap().is_skipped());
    }

    #[tokio::test]
    async fn test_invalid_candidates_are_dropped() {
        let pipeline = pipeline_with(
            vec![stub(
                "ner",
                vec![
                    Candidate::new("PERSON", 0, 2, 0.9, "ner"),
                    Candidate::new("PERSON", 3, 99, 0.9, "ner"),
                    Candidate::new("PERSON", 2, 2, 0.9, "ner"),
                    Candidate {
                        entity_type: "PERSON".to_string(),
                        start: 0,
                        end: 1,
                        score: f32::NAN,
                        origin: "ner".to_string(),
                    },
                ],
            )],
            PipelineSettings::default(),
        );

        let result = pipeline.process_text("山田さん").await.unwrap();
        assert_eq!(result.text(), Some("<PERSON>さん"));
        assert_eq!(result.audit().len(), 1);
    }

    #[tokio::test]
    async fn test_score_threshold_and_entity_filter() {
        let candidates = vec![
            Candidate::new("PERSON", 0, 2, 0.3, "ner"),
            Candidate::new("LOCATION", 3, 5, 0.9, "ner"),
            Candidate::new("ORG", 6, 8, 0.9, "ner"),
        ];
        let settings = PipelineSettings {
            score_threshold: 0.5,
            entities: vec!["PERSON".to_string(), "LOCATION".to_string()],
            ..PipelineSettings::default()
        };
        let pipeline = pipeline_with(vec![stub("ner", candidates)], settings);

        let (kept, faults) = pipeline.analyze("山田 東京 松本", "ja").await;
        assert!(faults.is_empty());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].entity_type, "LOCATION");
    }

    #[tokio::test]
    async fn test_deny_candidates_bypass_filters() {
        let candidates = vec![
            Candidate::new("DENY", 0, 2, 0.1, "deny"),
            Candidate::new("PERSON", 0, 2, 0.9, "ner"),
        ];
        let settings = PipelineSettings {
            score_threshold: 0.5,
            entities: vec!["PERSON".to_string()],
            ..PipelineSettings::default()
        };
        let pipeline = pipeline_with(vec![stub("ner", candidates)], settings);

        let result = pipeline.process_text("山田").await.unwrap();
        assert_eq!(result.text(), Some("山田"));
    }

    #[tokio::test]
    async fn test_language_selects_recognizers() {
        let config = ScrubberConfig {
            recognizers: vec![RecognizerDefinition::new(
                "en_mail",
                "en",
                RecognizerKind::Email { context: vec![] },
            )],
            ..ScrubberConfig::default()
        };
        let pipeline = Pipeline::from_config(&config).unwrap();

        let text = "mail: a@example.com";
        let ja = pipeline.process_text_with_language(text, "ja").await.unwrap();
        assert_eq!(ja.text(), Some(text));

        let en = pipeline.process_text_with_language(text, "en").await.unwrap();
        assert_eq!(en.text(), Some("mail: <EMAIL_ADDRESS>"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let settings = PipelineSettings {
            concurrency: 0,
            ..PipelineSettings::default()
        };
        let result = Pipeline::new(
            RecognizerRegistry::default(),
            AnonymizationRules::default(),
            settings,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_external_is_configuration_fault() {
        let config = ScrubberConfig {
            recognizers: vec![RecognizerDefinition::new(
                "ginza",
                "ja",
                RecognizerKind::External {
                    detector: "spacy".to_string(),
                },
            )],
            ..ScrubberConfig::default()
        };
        let err = Pipeline::from_config(&config).unwrap_err();
        assert!(err.is_configuration_fault());
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "recognizer panicked");
    }
}
