//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ScrubberConfig;
use crate::domain::errors::ScrubError;
use crate::domain::result::Result;
use crate::recognizer::RecognizerKind;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ScrubberConfig, rejecting unknown recognizer keys
/// 4. Applies environment variable overrides (SCRUBBER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file is missing or unreadable, a
/// referenced environment variable is unset, or parsing or validation fails.
///
/// # Examples
///
/// ```no_run
/// use scrubber::config::loader::load_config;
///
/// let config = load_config("scrubber.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ScrubberConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ScrubError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ScrubError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Same as [`load_config`] for in-memory TOML
pub fn load_config_from_str(contents: &str) -> Result<ScrubberConfig> {
    let contents = substitute_env_vars(contents)?;

    let table: toml::Table = contents
        .parse()
        .map_err(|e| ScrubError::Configuration(format!("Failed to parse TOML: {}", e)))?;
    check_recognizer_keys(&table)?;

    let mut config: ScrubberConfig = toml::Value::Table(table)
        .try_into()
        .map_err(|e| ScrubError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ScrubError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Rejects `[[recognizers]]` keys the entry's kind does not use
///
/// Recognizer payloads are flattened into the entry, so serde alone would
/// ignore a misspelled key and fall back to its default.
fn check_recognizer_keys(root: &toml::Table) -> Result<()> {
    let Some(entries) = root.get("recognizers").and_then(toml::Value::as_array) else {
        return Ok(());
    };

    for entry in entries.iter().filter_map(toml::Value::as_table) {
        let Some(kind) = entry.get("kind").and_then(toml::Value::as_str) else {
            continue;
        };
        let Some(payload) = RecognizerKind::payload_keys(kind) else {
            continue;
        };

        let name = entry
            .get("name")
            .and_then(toml::Value::as_str)
            .unwrap_or("<unnamed>");
        let unknown: Vec<&str> = entry
            .keys()
            .map(String::as_str)
            .filter(|key| !matches!(*key, "name" | "language" | "kind") && !payload.contains(key))
            .collect();

        if !unknown.is_empty() {
            return Err(ScrubError::invalid_recognizer(
                name,
                format!("unknown keys for kind '{kind}': {}", unknown.join(", ")),
            ));
        }
    }

    Ok(())
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ScrubError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut missing_vars: Vec<String> = Vec::new();

    let lines: Vec<String> = input
        .split('\n')
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }
            re.replace_all(line, |cap: &Captures<'_>| match std::env::var(&cap[1]) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == &cap[1]) {
                        missing_vars.push(cap[1].to_string());
                    }
                    cap[0].to_string()
                }
            })
            .into_owned()
        })
        .collect();

    if !missing_vars.is_empty() {
        return Err(ScrubError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ScrubError::Configuration(format!("Invalid {name} value: '{value}'")))
}

/// Applies environment variable overrides using SCRUBBER_* prefix
///
/// Environment variables follow the pattern: SCRUBBER_<SECTION>_<KEY>
/// For example: SCRUBBER_PIPELINE_CONCURRENCY, SCRUBBER_AUDIT_ENABLED
fn apply_env_overrides(config: &mut ScrubberConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("SCRUBBER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Pipeline overrides
    if let Ok(val) = std::env::var("SCRUBBER_PIPELINE_LANGUAGE") {
        config.pipeline.language = val;
    }
    if let Ok(val) = std::env::var("SCRUBBER_PIPELINE_CONCURRENCY") {
        config.pipeline.concurrency = parse_env("SCRUBBER_PIPELINE_CONCURRENCY", &val)?;
    }
    if let Ok(val) = std::env::var("SCRUBBER_PIPELINE_RECOGNIZER_TIMEOUT_MS") {
        config.pipeline.recognizer_timeout_ms =
            parse_env("SCRUBBER_PIPELINE_RECOGNIZER_TIMEOUT_MS", &val)?;
    }
    if let Ok(val) = std::env::var("SCRUBBER_PIPELINE_SCORE_THRESHOLD") {
        config.pipeline.score_threshold = parse_env("SCRUBBER_PIPELINE_SCORE_THRESHOLD", &val)?;
    }
    if let Ok(val) = std::env::var("SCRUBBER_PIPELINE_BUILTIN_RECOGNIZERS") {
        config.pipeline.builtin_recognizers =
            parse_env("SCRUBBER_PIPELINE_BUILTIN_RECOGNIZERS", &val)?;
    }

    // Audit overrides
    if let Ok(val) = std::env::var("SCRUBBER_AUDIT_ENABLED") {
        config.audit.enabled = parse_env("SCRUBBER_AUDIT_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("SCRUBBER_AUDIT_LOG_PATH") {
        config.audit.log_path = val.into();
    }

    // Logging overrides
    if let Ok(val) = std::env::var("SCRUBBER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("SCRUBBER_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("SCRUBBER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("SCRUBBER_TEST_AUDIT_DIR", "/tmp/audit");
        let input = "log_path = \"${SCRUBBER_TEST_AUDIT_DIR}/audit.log\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "log_path = \"/tmp/audit/audit.log\"");
        std::env::remove_var("SCRUBBER_TEST_AUDIT_DIR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("SCRUBBER_TEST_MISSING_VAR");
        let input = "log_path = \"${SCRUBBER_TEST_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("SCRUBBER_TEST_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("SCRUBBER_TEST_COMMENTED");
        let input = "# path = \"${SCRUBBER_TEST_COMMENTED}\"\nlanguage = \"ja\"\n";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[pipeline]
language = "ja"
concurrency = 2
entities = ["JA_CURRENCY", "JA_INT_PHONE"]

[[recognizers]]
name = "project_code"
language = "ja"
kind = "pattern"
entity = "PROJECT_CODE"

[[recognizers.patterns]]
name = "project code"
regex = 'PRJ-\d{4}'
score = 0.8

[anonymization.rules.JA_CURRENCY]
type = "replace"
new_value = "<金額>"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.pipeline.concurrency, 2);
        assert_eq!(config.pipeline.entities.len(), 2);
        assert_eq!(config.recognizers.len(), 1);
        assert_eq!(config.recognizers[0].name, "project_code");
        assert!(config.anonymization.rules.contains_key("JA_CURRENCY"));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let err = load_config_from_str("[pipeline\nlanguage = ").unwrap_err();
        assert!(err.is_configuration_fault());
    }

    #[test]
    fn test_misspelled_recognizer_key_rejected() {
        let err = load_config_from_str(
            "[[recognizers]]\nname = \"phones\"\nkind = \"phone\"\nregons = [\"US\"]\n",
        )
        .unwrap_err();
        assert!(err.is_configuration_fault());
        assert!(err.to_string().contains("regons"));
        assert!(err.to_string().contains("phones"));

        let err = load_config_from_str(
            "[[recognizers]]\nname = \"mail\"\nkind = \"email\"\ncontex = [\"メール\"]\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("contex"));
    }

    #[test]
    fn test_known_recognizer_keys_accepted() {
        let config = load_config_from_str(
            "[[recognizers]]\nname = \"phones\"\nlanguage = \"ja\"\nkind = \"phone\"\nregions = [\"JP\"]\ncontext = [\"電話\"]\n",
        )
        .unwrap();
        assert_eq!(config.recognizers.len(), 1);
    }

    #[test]
    fn test_load_config_validation_failure() {
        let err = load_config_from_str("[pipeline]\nconcurrency = 0").unwrap_err();
        assert!(err.to_string().contains("validation failed"));
    }
}
