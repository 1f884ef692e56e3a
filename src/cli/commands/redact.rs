//! Redact command implementation
//!
//! This module implements the `redact` command: read a text file, run the
//! batch through the pipeline and write the redacted lines.

use crate::audit::AuditLogger;
use crate::config::{load_config, load_config_from_str, ScrubberConfig};
use crate::domain::ScrubError;
use crate::io::{read_text_file_to_list, write_lines};
use crate::pipeline::{BatchOrchestrator, BatchOutput, Pipeline};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;

/// Output format of the batch summary
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SummaryFormat {
    #[default]
    Console,
    Json,
}

/// Arguments for the redact command
#[derive(Args, Debug)]
pub struct RedactArgs {
    /// Input text file, one text per line
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file for the redacted texts
    #[arg(short, long, default_value = "./data/anonymized_text.txt")]
    pub output: PathBuf,

    /// Override the batch language
    #[arg(long)]
    pub language: Option<String>,

    /// Dry run mode - report detections without writing the output file
    #[arg(long)]
    pub dry_run: bool,

    /// Don't print the per-text report
    #[arg(short, long)]
    pub quiet: bool,

    /// Batch summary format
    #[arg(long, value_enum, default_value_t = SummaryFormat::Console)]
    pub format: SummaryFormat,
}

impl RedactArgs {
    /// Execute the redact command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Starting redact command");

        let mut config = match Self::load(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Apply CLI overrides
        if let Some(language) = &self.language {
            tracing::info!(language = %language, "Overriding language from CLI");
            config.pipeline.language = language.clone();
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("❌ Configuration validation failed: {e}");
            return Ok(2);
        }

        let pipeline = match Pipeline::from_config(&config) {
            Ok(p) => Arc::new(p),
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to build pipeline");
                eprintln!("❌ Failed to build pipeline: {e}");
                return Ok(if e.is_configuration_fault() { 2 } else { 5 });
            }
        };

        let texts = match read_text_file_to_list(&self.input) {
            Ok(t) => t,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to read input");
                eprintln!("❌ {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        let mut orchestrator =
            BatchOrchestrator::new(pipeline).with_shutdown_signal(shutdown_signal);
        if config.audit.enabled {
            let logger = AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
                true,
            )?;
            orchestrator = orchestrator.with_audit_logger(logger);
        }

        if self.dry_run {
            tracing::info!("Dry run mode enabled - no output will be written");
            println!("🔍 DRY RUN MODE - No output file will be written");
        }

        let output = match orchestrator.run(texts.clone()).await {
            Ok(o) => o,
            Err(ScrubError::Interrupted { completed, total }) => {
                println!();
                println!("⚠️  Redaction interrupted after {completed} of {total} texts.");
                println!("   No output was written.");
                tracing::info!("Redaction interrupted by user signal");
                return Ok(130); // SIGINT exit code (standard Unix convention)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Redaction failed");
                eprintln!("❌ Redaction failed: {e}");
                return Ok(5);
            }
        };

        if !self.quiet {
            print_report(&texts, &output);
        }

        if !self.dry_run {
            let redacted: Vec<&str> = output.results.iter().filter_map(|r| r.text()).collect();
            if let Err(e) = write_lines(&self.output, &redacted) {
                crate::log_error_with_context!(&e, "Failed to write output");
                eprintln!("❌ {e}");
                return Ok(5);
            }
            println!();
            println!(
                "✅ Wrote {} redacted texts to {}",
                redacted.len(),
                self.output.display()
            );
        }

        println!("{}", self.render_summary(&output)?);

        Ok(0)
    }

    fn render_summary(&self, output: &BatchOutput) -> anyhow::Result<String> {
        Ok(match self.format {
            SummaryFormat::Console => output.summary.format_console(),
            SummaryFormat::Json => output.summary.format_json()?,
        })
    }

    /// Load the configuration file, falling back to defaults when it is absent
    fn load(config_path: &str) -> crate::domain::Result<ScrubberConfig> {
        if Path::new(config_path).exists() {
            load_config(config_path)
        } else {
            tracing::warn!(
                config_path = %config_path,
                "Configuration file not found, using built-in defaults"
            );
            load_config_from_str("")
        }
    }
}

/// Per-text report: original, redacted text and detected values
fn print_report(texts: &[String], output: &BatchOutput) {
    for (i, (text, result)) in texts.iter().zip(&output.results).enumerate() {
        match result.text() {
            None => {
                println!();
                println!("文章 {}: 空または処理不要", i + 1);
            }
            Some(redacted) => {
                println!();
                println!("文章 {}:", i + 1);
                println!("元のテキスト: {text}");
                println!("匿名化されたテキスト: {redacted}");

                if !result.audit().is_empty() {
                    println!("検出された情報:");
                    for entry in result.audit() {
                        println!("  {}: {}", entry.entity_type, entry.original);
                    }
                }

                for fault in result.faults() {
                    println!("  ⚠️  {} ({}): {}", fault.recognizer, fault.kind, fault.message);
                }
            }
        }
    }
}
