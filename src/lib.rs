// Scrubber - PII detection and redaction tool
// Copyright (c) 2025 Scrubber Contributors
// Licensed under the MIT License

//! # Scrubber - PII detection and redaction
//!
//! Scrubber finds personally identifiable information in free-form text
//! (Japanese first) and rewrites it with entity placeholders.
//!
//! ## Overview
//!
//! For each text of a batch, Scrubber:
//! - **Detects** candidate spans with a registry of recognizers (regex
//!   patterns with context boosting, deny lists, phone/email/credit-card
//!   validators and pluggable external detectors)
//! - **Resolves** overlapping candidates into a disjoint set, letting deny-list
//!   hits veto everything they touch
//! - **Rewrites** the text with a per-entity operator (tag, replace, redact,
//!   mask, hash or a custom closure)
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`pipeline`] - Per-text pipeline and the bounded-concurrency batch driver
//! - [`recognizer`] - Recognizer trait, built-in recognizers and the registry
//! - [`resolver`] - Overlap and veto resolution
//! - [`anonymizer`] - Operators, rules and the rewriter
//! - [`audit`] - Hashed audit log
//! - [`domain`] - Spans, offsets and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`io`] - Line-oriented text files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrubber::config::ScrubberConfig;
//! use scrubber::pipeline::{BatchOrchestrator, Pipeline};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Arc::new(Pipeline::from_config(&ScrubberConfig::default())?);
//!     let orchestrator = BatchOrchestrator::new(pipeline);
//!
//!     let output = orchestrator
//!         .run(vec!["".to_string(), "500円になります".to_string()])
//!         .await?;
//!
//!     assert!(output.results[0].is_skipped());
//!     assert_eq!(output.results[1].text(), Some("<JA_CURRENCY>円になります"));
//!     Ok(())
//! }
//! ```
//!
//! ## External Detectors
//!
//! Any type implementing [`recognizer::Recognizer`] can take part in
//! detection. A configuration entry with `kind = "external"` names the
//! detector; the implementation is supplied when the pipeline is built.
//! The entry's `name` and `language` replace the detector's own, so one
//! detector may back several entries:
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use scrubber::config::ScrubberConfig;
//! use scrubber::domain::Candidate;
//! use scrubber::pipeline::Pipeline;
//! use scrubber::recognizer::Recognizer;
//! use std::sync::Arc;
//!
//! struct NameModel {
//!     entities: Vec<String>,
//! }
//!
//! #[async_trait]
//! impl Recognizer for NameModel {
//!     fn name(&self) -> &str { "ner" }
//!     fn supported_language(&self) -> &str { "ja" }
//!     fn supported_entities(&self) -> &[String] { &self.entities }
//!
//!     async fn scan(&self, _text: &str, _language: &str) -> anyhow::Result<Vec<Candidate>> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! # fn example(config: &ScrubberConfig) -> scrubber::domain::Result<()> {
//! let model: Arc<dyn Recognizer> = Arc::new(NameModel { entities: vec!["PERSON".into()] });
//! let pipeline = Pipeline::from_config_with_externals(config, [("spacy".to_string(), model)])?;
//! # Ok(())
//! # }
//! ```
//!
//! Errors, panics and time-outs raised by a recognizer are recorded as
//! [`pipeline::RecognizerFault`]s; the text is still redacted using the
//! remaining recognizers.

pub mod anonymizer;
pub mod audit;
pub mod cli;
pub mod config;
pub mod domain;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod recognizer;
pub mod resolver;

pub use domain::{Result, ScrubError};
pub use pipeline::{BatchOrchestrator, BatchOutput, Pipeline, PipelineResult};
