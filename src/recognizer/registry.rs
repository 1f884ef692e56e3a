//! Recognizer registry
//!
//! An immutable set of recognizers, built once from definitions plus any
//! externally supplied detectors and shared read-only by the pipeline.

use super::context::ContextSettings;
use super::definition::RecognizerDefinition;
use super::Recognizer;
use crate::domain::{Result, ScrubError};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const BUILTIN_RECOGNIZERS: &str = include_str!("../../patterns/default_recognizers.toml");

#[derive(Debug, Deserialize)]
struct DefinitionFile {
    #[serde(default)]
    recognizers: Vec<RecognizerDefinition>,
}

/// Parse recognizer definitions from a TOML document with `[[recognizers]]` tables
pub fn parse_definitions(content: &str) -> Result<Vec<RecognizerDefinition>> {
    let file: DefinitionFile = toml::from_str(content)?;
    Ok(file.recognizers)
}

/// The embedded Japanese recognizer set
pub fn builtin_definitions() -> Result<Vec<RecognizerDefinition>> {
    parse_definitions(BUILTIN_RECOGNIZERS)
}

/// Immutable collection of recognizers
#[derive(Clone, Default)]
pub struct RecognizerRegistry {
    recognizers: Vec<Arc<dyn Recognizer>>,
}

impl std::fmt::Debug for RecognizerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognizerRegistry")
            .field("recognizers", &self.names())
            .finish()
    }
}

impl RecognizerRegistry {
    /// Start building a registry
    pub fn builder() -> RecognizerRegistryBuilder {
        RecognizerRegistryBuilder::default()
    }

    /// Registry with the embedded recognizer set only
    pub fn builtin() -> Result<Self> {
        Self::builder().definitions(builtin_definitions()?).build()
    }

    /// All recognizers in registration order
    pub fn recognizers(&self) -> &[Arc<dyn Recognizer>] {
        &self.recognizers
    }

    /// Recognizers that apply to `language`
    pub fn for_language(&self, language: &str) -> Vec<Arc<dyn Recognizer>> {
        self.recognizers
            .iter()
            .filter(|r| r.supports_language(language))
            .cloned()
            .collect()
    }

    /// Recognizer names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.recognizers.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }
}

/// Builder for [`RecognizerRegistry`]
#[derive(Default)]
pub struct RecognizerRegistryBuilder {
    definitions: Vec<RecognizerDefinition>,
    externals: HashMap<String, Arc<dyn Recognizer>>,
    instances: Vec<Arc<dyn Recognizer>>,
    settings: ContextSettings,
}

impl RecognizerRegistryBuilder {
    /// Add definitions (built in order)
    pub fn definitions(mut self, definitions: impl IntoIterator<Item = RecognizerDefinition>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    /// Add one definition
    pub fn definition(mut self, definition: RecognizerDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Supply a detector that `external` definitions can reference by `detector` name
    pub fn external(mut self, detector: impl Into<String>, recognizer: Arc<dyn Recognizer>) -> Self {
        self.externals.insert(detector.into(), recognizer);
        self
    }

    /// Register a ready-made recognizer directly
    pub fn recognizer(mut self, recognizer: Arc<dyn Recognizer>) -> Self {
        self.instances.push(recognizer);
        self
    }

    /// Context window and boost for pattern-based recognizers
    pub fn context_settings(mut self, settings: ContextSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build every definition and freeze the registry
    ///
    /// # Errors
    ///
    /// Any invalid definition, unknown external detector or duplicate
    /// recognizer name is a configuration fault.
    pub fn build(self) -> Result<RecognizerRegistry> {
        if !(self.settings.boost.is_finite() && (0.0..=1.0).contains(&self.settings.boost)) {
            return Err(ScrubError::Configuration(format!(
                "context boost {} is outside [0.0, 1.0]",
                self.settings.boost
            )));
        }

        let mut recognizers: Vec<Arc<dyn Recognizer>> =
            Vec::with_capacity(self.definitions.len() + self.instances.len());

        for definition in &self.definitions {
            let recognizer = definition.build(self.settings, &self.externals)?;
            tracing::debug!(
                recognizer = %definition.name,
                kind = definition.kind.label(),
                language = %definition.language,
                "Registered recognizer"
            );
            recognizers.push(recognizer);
        }
        recognizers.extend(self.instances);

        let mut seen = HashSet::new();
        for recognizer in &recognizers {
            if !seen.insert(recognizer.name().to_string()) {
                return Err(ScrubError::invalid_recognizer(
                    recognizer.name(),
                    "duplicate recognizer name",
                ));
            }
        }

        Ok(RecognizerRegistry { recognizers })
    }
}
