//! Recognizer framework
//!
//! Provides the trait-based detection interface and its built-in
//! implementations:
//! - **Pattern**: regex patterns with lookaround and context-word boosting
//! - **Deny list**: literals that veto overlapping detections
//! - **Predefined**: phone, email and credit card formats with validation
//! - **External**: any caller-supplied [`Recognizer`], e.g. an NLP model
//!
//! Recognizers are assembled into an immutable [`RecognizerRegistry`] from
//! [`RecognizerDefinition`]s.

pub mod context;
pub mod definition;
pub mod deny_list;
pub mod external;
pub mod pattern;
pub mod predefined;
pub mod registry;

use crate::domain::Candidate;
use async_trait::async_trait;

pub use context::{ContextEnhancer, ContextSettings};
pub use definition::{RecognizerDefinition, RecognizerKind};
pub use deny_list::DenyListRecognizer;
pub use external::ExternalRecognizer;
pub use pattern::{CompiledPattern, PatternDefinition, PatternRecognizer};
pub use registry::{RecognizerRegistry, RecognizerRegistryBuilder};

/// Language tag matching every batch language
pub const ANY_LANGUAGE: &str = "any";

/// Trait for entity recognizers
///
/// Implementations must report spans as character offsets over `text` and
/// use their own [`name`](Recognizer::name) as the candidate origin. Errors
/// returned from [`scan`](Recognizer::scan) are isolated by the pipeline and
/// never abort a batch.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Unique recognizer name
    fn name(&self) -> &str;

    /// Language tag this recognizer applies to
    fn supported_language(&self) -> &str;

    /// Entity types this recognizer can produce
    fn supported_entities(&self) -> &[String];

    /// Whether this recognizer should run for `language`
    fn supports_language(&self, language: &str) -> bool {
        let supported = self.supported_language();
        supported == ANY_LANGUAGE || supported.eq_ignore_ascii_case(language)
    }

    /// Scan `text` and return candidates
    async fn scan(&self, text: &str, language: &str) -> anyhow::Result<Vec<Candidate>>;
}
