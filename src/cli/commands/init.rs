//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "scrubber.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Scrubber configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Add [[recognizers]] entries for your own patterns");
                println!("  3. Validate configuration: scrubber validate-config");
                println!("  4. Run: scrubber redact --input ./data/input.txt");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate configuration with comments
    fn generate_config() -> String {
        r#"# Scrubber Configuration File
# PII detection and redaction for free text

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Pipeline
# ============================================================================
[pipeline]
# Language of the input texts; recognizers for other languages are not run
language = "ja"

# Maximum number of texts processed at the same time (1-256)
concurrency = 4

# Time limit per recognizer invocation in milliseconds (0 = no limit)
recognizer_timeout_ms = 10000

# Candidates scoring below this are dropped (deny-list hits always pass)
score_threshold = 0.0

# Entity types to redact (empty = all)
entities = []

# Load the embedded Japanese recognizers (phone, currency, extension, deny words)
builtin_recognizers = true

# Context words within this many tokens of a match raise its score
context_window = 5
context_boost = 0.35

# ============================================================================
# Additional Recognizers
# ============================================================================
# [[recognizers]]
# name = "employee_id"
# language = "ja"
# kind = "pattern"
# entity = "EMPLOYEE_ID"
# context = ["社員番号"]
# patterns = [{ name = "employee_id", regex = "EMP-\\d{6}", score = 0.6 }]

# [[recognizers]]
# name = "email"
# language = "any"
# kind = "email"

# [[recognizers]]
# name = "credit_card"
# language = "any"
# kind = "credit_card"

# [[recognizers]]
# name = "do_not_touch"
# kind = "deny_list"
# words = ["VISA/4444-5555-6666-7777"]

# ============================================================================
# Anonymization
# ============================================================================
[anonymization]
# Default operator: tag | replace | redact | mask | hash
default = { type = "tag" }

# [anonymization.rules.PHONE_NUMBER]
# type = "mask"
# masking_char = "*"
# chars_to_mask = 4
# from_end = true

# [anonymization.rules.EMAIL_ADDRESS]
# type = "replace"
# new_value = "<MAIL>"

# ============================================================================
# Audit Log
# ============================================================================
[audit]
# Record detections per text; original values are stored as SHA-256 hashes
enabled = false
log_path = "./audit/scrubber_audit.log"
json_format = true

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log directory
local_path = "./logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;
    use tempfile::tempdir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "scrubber.toml".to_string(),
            force: false,
        };

        assert_eq!(args.output, "scrubber.toml");
        assert!(!args.force);
    }

    #[test]
    fn test_generated_config_is_loadable() {
        let config = load_config_from_str(&InitArgs::generate_config()).unwrap();
        assert_eq!(config.pipeline.language, "ja");
        assert_eq!(config.pipeline.concurrency, 4);
        assert!(config.pipeline.builtin_recognizers);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scrubber.toml");
        fs::write(&path, "# existing").unwrap();

        let args = InitArgs {
            output: path.to_str().unwrap().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# existing");

        let forced = InitArgs {
            output: path.to_str().unwrap().to_string(),
            force: true,
        };
        assert_eq!(forced.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&path).unwrap().contains("[pipeline]"));
    }
}
