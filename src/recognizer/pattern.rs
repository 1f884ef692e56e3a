//! Regex pattern recognizer

use super::context::{tokenize, ContextEnhancer};
use super::Recognizer;
use crate::domain::{Candidate, CharIndex, Result, ScrubError};
use anyhow::Context as _;
use async_trait::async_trait;
use fancy_regex::Regex;
use serde::{Deserialize, Serialize};

/// Post-match check; matches for which it returns `false` are dropped
pub type Validator = fn(&str) -> bool;

/// Pattern definition from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDefinition {
    /// Human-readable pattern name
    pub name: String,
    /// Regular expression (lookaround is supported)
    pub regex: String,
    /// Base score (0.0 - 1.0)
    pub score: f32,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Pattern name
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
    /// Base score
    pub score: f32,
    /// Optional validation of the matched text
    pub validator: Option<Validator>,
}

impl CompiledPattern {
    /// Compile a pattern, reporting failures against the owning recognizer
    pub fn compile(recognizer: &str, definition: &PatternDefinition) -> Result<Self> {
        if !(0.0..=1.0).contains(&definition.score) {
            return Err(ScrubError::invalid_recognizer(
                recognizer,
                format!(
                    "score {} of pattern '{}' is outside [0.0, 1.0]",
                    definition.score, definition.name
                ),
            ));
        }

        let regex = Regex::new(&definition.regex).map_err(|e| {
            ScrubError::invalid_recognizer(
                recognizer,
                format!("invalid regex in pattern '{}': {e}", definition.name),
            )
        })?;

        Ok(Self {
            name: definition.name.clone(),
            regex,
            score: definition.score,
            validator: None,
        })
    }

    /// Attach a validator
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }
}

/// Recognizer producing one candidate per regex match
#[derive(Debug, Clone)]
pub struct PatternRecognizer {
    name: String,
    language: String,
    entities: Vec<String>,
    patterns: Vec<CompiledPattern>,
    context: ContextEnhancer,
}

impl PatternRecognizer {
    /// Create a pattern recognizer from compiled patterns
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        entity: impl Into<String>,
        patterns: Vec<CompiledPattern>,
        context: ContextEnhancer,
    ) -> Result<Self> {
        let name = name.into();
        if patterns.is_empty() {
            return Err(ScrubError::invalid_recognizer(
                &name,
                "at least one pattern is required",
            ));
        }
        let entity = entity.into();
        if entity.trim().is_empty() {
            return Err(ScrubError::invalid_recognizer(&name, "entity cannot be empty"));
        }

        Ok(Self {
            name,
            language: language.into(),
            entities: vec![entity],
            patterns,
            context,
        })
    }

    /// Compile pattern definitions and create the recognizer
    pub fn from_definitions(
        name: &str,
        language: &str,
        entity: &str,
        definitions: &[PatternDefinition],
        context: ContextEnhancer,
    ) -> Result<Self> {
        let patterns = definitions
            .iter()
            .map(|def| CompiledPattern::compile(name, def))
            .collect::<Result<Vec<_>>>()?;
        Self::new(name, language, entity, patterns, context)
    }

    /// Entity type produced by this recognizer
    pub fn entity(&self) -> &str {
        &self.entities[0]
    }

    /// Compiled patterns
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Run every pattern over `text`
    ///
    /// Fails when the regex engine aborts a match (e.g. backtrack limit).
    pub fn analyze(&self, text: &str) -> anyhow::Result<Vec<Candidate>> {
        let index = CharIndex::new(text);
        let mut tokens = None;
        let mut candidates = Vec::new();

        for pattern in &self.patterns {
            for found in pattern.regex.find_iter(text) {
                let found = found.with_context(|| {
                    format!("pattern '{}' failed while matching", pattern.name)
                })?;

                if found.start() == found.end() {
                    continue;
                }
                if let Some(validate) = pattern.validator {
                    if !validate(found.as_str()) {
                        tracing::trace!(
                            recognizer = %self.name,
                            pattern = %pattern.name,
                            "Match rejected by validator"
                        );
                        continue;
                    }
                }

                let Some(chars) = index.char_range(found.start()..found.end()) else {
                    continue;
                };

                let score = if self.context.is_enabled() {
                    let tokens = tokens.get_or_insert_with(|| tokenize(text));
                    self.context
                        .enhance(tokens, chars.start, chars.end, pattern.score)
                } else {
                    pattern.score
                };

                candidates.push(Candidate::new(
                    self.entity(),
                    chars.start,
                    chars.end,
                    score,
                    &self.name,
                ));
            }
        }

        Ok(candidates)
    }
}

#[async_trait]
impl Recognizer for PatternRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_language(&self) -> &str {
        &self.language
    }

    fn supported_entities(&self) -> &[String] {
        &self.entities
    }

    async fn scan(&self, text: &str, _language: &str) -> anyhow::Result<Vec<Candidate>> {
        self.analyze(text)
    }
}
