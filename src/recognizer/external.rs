//! Host-supplied detectors bound to a recognizer definition

use super::Recognizer;
use crate::domain::Candidate;
use async_trait::async_trait;
use std::sync::Arc;

/// A host detector running under the name and language of its definition
///
/// Candidates are re-tagged with the definition name, so one detector can
/// back several definitions (e.g. one per language).
pub struct ExternalRecognizer {
    name: String,
    language: String,
    detector: Arc<dyn Recognizer>,
}

impl ExternalRecognizer {
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        detector: Arc<dyn Recognizer>,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            detector,
        }
    }

    /// Name the host registered the detector under
    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }
}

#[async_trait]
impl Recognizer for ExternalRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_language(&self) -> &str {
        &self.language
    }

    fn supported_entities(&self) -> &[String] {
        self.detector.supported_entities()
    }

    async fn scan(&self, text: &str, language: &str) -> anyhow::Result<Vec<Candidate>> {
        let mut candidates = self.detector.scan(text, language).await?;
        for candidate in &mut candidates {
            candidate.origin.clone_from(&self.name);
        }
        Ok(candidates)
    }
}
