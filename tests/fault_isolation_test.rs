//! Recognizer fault isolation tests
//!
//! A recognizer that errors, panics or runs past its time limit contributes
//! no candidates; the remaining recognizers still redact the text.

use async_trait::async_trait;
use scrubber::config::load_config_from_str;
use scrubber::domain::Candidate;
use scrubber::pipeline::{BatchOrchestrator, FaultKind, Pipeline};
use scrubber::recognizer::Recognizer;
use std::sync::Arc;
use std::time::Duration;

enum Behavior {
    Fail,
    Panic,
    Hang,
}

struct FaultyRecognizer {
    name: String,
    behavior: Behavior,
    entities: Vec<String>,
}

#[async_trait]
impl Recognizer for FaultyRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_language(&self) -> &str {
        "ja"
    }

    fn supported_entities(&self) -> &[String] {
        &self.entities
    }

    async fn scan(&self, text: &str, _language: &str) -> anyhow::Result<Vec<Candidate>> {
        match self.behavior {
            Behavior::Fail => anyhow::bail!("model not loaded"),
            Behavior::Panic => panic!("tokenizer exploded"),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(vec![Candidate::new(
                    "PERSON",
                    0,
                    text.chars().count(),
                    1.0,
                    &self.name,
                )])
            }
        }
    }
}

fn faulty(name: &str, behavior: Behavior) -> (String, Arc<dyn Recognizer>) {
    let recognizer: Arc<dyn Recognizer> = Arc::new(FaultyRecognizer {
        name: name.to_string(),
        behavior,
        entities: vec!["PERSON".to_string()],
    });
    (name.to_string(), recognizer)
}

fn pipeline_with_faulty_detectors() -> Pipeline {
    let config = load_config_from_str(
        r#"
[pipeline]
recognizer_timeout_ms = 100

[[recognizers]]
name = "failing"
language = "ja"
kind = "external"
detector = "failing"

[[recognizers]]
name = "panicking"
language = "ja"
kind = "external"
detector = "panicking"

[[recognizers]]
name = "hanging"
language = "ja"
kind = "external"
detector = "hanging"
"#,
    )
    .expect("Failed to load config");

    Pipeline::from_config_with_externals(
        &config,
        [
            faulty("failing", Behavior::Fail),
            faulty("panicking", Behavior::Panic),
            faulty("hanging", Behavior::Hang),
        ],
    )
    .expect("Failed to build pipeline")
}

#[tokio::test]
async fn test_faulty_recognizers_do_not_block_redaction() {
    let pipeline = pipeline_with_faulty_detectors();

    let result = pipeline
        .process_text("お問い合わせは内線:1234まで")
        .await
        .expect("Faults must not fail the text");

    assert_eq!(result.text(), Some("お問い合わせは内線:<JA_INT_PHONE>まで"));

    let mut faults: Vec<_> = result
        .faults()
        .iter()
        .map(|f| (f.recognizer.as_str(), f.kind))
        .collect();
    faults.sort();
    assert_eq!(
        faults,
        vec![
            ("failing", FaultKind::Error),
            ("hanging", FaultKind::Timeout),
            ("panicking", FaultKind::Panic),
        ]
    );

    let panic = result
        .faults()
        .iter()
        .find(|f| f.kind == FaultKind::Panic)
        .unwrap();
    assert_eq!(panic.message, "tokenizer exploded");
}

#[tokio::test]
async fn test_faults_are_counted_in_batch_summary() {
    let orchestrator = BatchOrchestrator::new(Arc::new(pipeline_with_faulty_detectors()));

    let output = orchestrator
        .run(vec!["500円になります".to_string(), " ".to_string()])
        .await
        .expect("Batch failed");

    assert_eq!(output.results[0].text(), Some("<JA_CURRENCY>円になります"));
    assert!(output.results[1].is_skipped());
    assert_eq!(output.summary.total_faults(), 3);
    assert_eq!(output.summary.faults_by_recognizer.get("hanging"), Some(&1));

    let mut warnings = output.summary.warnings.clone();
    warnings.sort();
    assert_eq!(
        warnings,
        vec![
            "Text 1: recognizer 'failing' error (model not loaded)",
            "Text 1: recognizer 'hanging' timeout (timed out after 100 ms)",
            "Text 1: recognizer 'panicking' panic (tokenizer exploded)",
        ]
    );
    assert!(output.summary.format_console().contains("recognizer 'panicking' panic"));
}

#[tokio::test]
async fn test_faulty_recognizers_skipped_for_other_language() {
    let pipeline = pipeline_with_faulty_detectors();

    let result = pipeline
        .process_text_with_language("call me", "en")
        .await
        .unwrap();

    assert_eq!(result.text(), Some("call me"));
    assert!(result.faults().is_empty());
}
