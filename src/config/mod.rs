//! Configuration management for Scrubber.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Scrubber uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting
//! - `SCRUBBER_*` environment variable overrides
//! - Comprehensive validation
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`PipelineConfig`] - Language, concurrency, timeouts, filters, context scoring
//! - `[[recognizers]]` - Additional [`RecognizerDefinition`](crate::recognizer::RecognizerDefinition)s
//! - `[anonymization]` - Default operator and per-entity rules
//! - [`AuditConfig`] - Audit log file
//! - [`LoggingConfig`] - Local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [pipeline]
//! language = "ja"
//! concurrency = 4
//! recognizer_timeout_ms = 10000
//!
//! [[recognizers]]
//! name = "mail"
//! kind = "email"
//!
//! [anonymization.rules.EMAIL_ADDRESS]
//! type = "mask"
//! chars_to_mask = 6
//!
//! [audit]
//! enabled = true
//! log_path = "${SCRUBBER_AUDIT_DIR}/audit.log"
//! ```
//!
//! # Validation
//!
//! ```rust,no_run
//! use scrubber::config::load_config;
//!
//! # fn example() {
//! match load_config("scrubber.toml") {
//!     Ok(config) => println!("Configuration valid"),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{ApplicationConfig, AuditConfig, LoggingConfig, PipelineConfig, ScrubberConfig};
