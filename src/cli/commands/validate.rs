//! Validate config command implementation
//!
//! This module implements the `validate-config` command. Beyond parsing and
//! validating the file it builds the recognizer registry, so unparsable
//! patterns and unknown detectors are reported here too.

use crate::config::load_config;
use crate::pipeline::Pipeline;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Load and validate configuration
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Build recognizers and rules
        let pipeline = match Pipeline::from_config(&config) {
            Ok(p) => p,
            Err(e) => {
                println!("❌ Recognizer or rule configuration is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(if e.is_configuration_fault() { 2 } else { 5 });
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Language: {}", config.pipeline.language);
        println!("  Concurrency: {}", config.pipeline.concurrency);
        println!(
            "  Recognizer Timeout: {}",
            match config.pipeline.recognizer_timeout() {
                Some(limit) => format!("{} ms", limit.as_millis()),
                None => "disabled".to_string(),
            }
        );
        println!("  Score Threshold: {}", config.pipeline.score_threshold);
        println!(
            "  Entities: {}",
            if config.pipeline.entities.is_empty() {
                "All".to_string()
            } else {
                format!("{:?}", config.pipeline.entities)
            }
        );
        println!("  Recognizers: {:?}", pipeline.registry().names());
        println!(
            "  Default Operator: {}",
            config.anonymization.default.build("*")?.name()
        );
        println!("  Rules: {}", config.anonymization.rules.len());
        println!("  Audit Log: {}", if config.audit.enabled { "enabled" } else { "disabled" });
        println!();

        Ok(0)
    }
}
