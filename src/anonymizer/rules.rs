//! Per-entity anonymization rules

use super::operator::{Operator, OperatorConfig};
use crate::domain::{Result, ScrubError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Rule table as written in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Operator for entity types without a rule
    #[serde(default)]
    pub default: OperatorConfig,

    /// Operators keyed by entity type
    #[serde(default)]
    pub rules: BTreeMap<String, OperatorConfig>,
}

/// Resolved operator table
#[derive(Debug, Clone, Default)]
pub struct AnonymizationRules {
    default: Operator,
    rules: HashMap<String, Operator>,
}

impl AnonymizationRules {
    /// Rules with `default` as the fallback operator and no per-entity rules
    pub fn new(default: Operator) -> Self {
        Self {
            default,
            rules: HashMap::new(),
        }
    }

    /// Build rules from configuration
    pub fn from_config(config: &RulesConfig) -> Result<Self> {
        let default = config.default.build("default")?;
        let mut rules = HashMap::with_capacity(config.rules.len());
        for (entity_type, operator) in &config.rules {
            validate_entity_type(entity_type)?;
            rules.insert(entity_type.clone(), operator.build(entity_type)?);
        }
        Ok(Self { default, rules })
    }

    /// Add or replace the rule for `entity_type`
    pub fn with_rule(mut self, entity_type: impl Into<String>, operator: Operator) -> Result<Self> {
        let entity_type = entity_type.into();
        validate_entity_type(&entity_type)?;
        self.rules.insert(entity_type, operator);
        Ok(self)
    }

    /// Shorthand for a [`Operator::Custom`] rule
    pub fn with_custom<F>(self, entity_type: impl Into<String>, f: F) -> Result<Self>
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.with_rule(entity_type, Operator::custom(f))
    }

    /// Operator applied to `entity_type`
    pub fn operator_for(&self, entity_type: &str) -> &Operator {
        self.rules.get(entity_type).unwrap_or(&self.default)
    }
}

fn validate_entity_type(entity_type: &str) -> Result<()> {
    if entity_type.trim().is_empty() {
        return Err(ScrubError::InvalidRule {
            entity_type: entity_type.to_string(),
            reason: "entity type cannot be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_tag() {
        let rules = AnonymizationRules::default();
        assert_eq!(rules.operator_for("PHONE_NUMBER").apply("PHONE_NUMBER", "x"), "<PHONE_NUMBER>");
    }

    #[test]
    fn test_from_config() {
        let config: RulesConfig = toml::from_str(
            r#"
            default = { type = "replace", new_value = "<PII>" }

            [rules.PHONE_NUMBER]
            type = "mask"
            chars_to_mask = 4
            from_end = true
            "#,
        )
        .unwrap();

        let rules = AnonymizationRules::from_config(&config).unwrap();
        assert_eq!(rules.operator_for("JA_CURRENCY").apply("JA_CURRENCY", "500"), "<PII>");
        assert_eq!(
            rules.operator_for("PHONE_NUMBER").apply("PHONE_NUMBER", "090-1234-5678"),
            "090-1234-****"
        );
    }

    #[test]
    fn test_custom_rule() {
        let rules = AnonymizationRules::default()
            .with_custom("JA_CURRENCY", |_| "***円相当".to_string())
            .unwrap();
        assert_eq!(rules.operator_for("JA_CURRENCY").name(), "custom");
        assert_eq!(rules.operator_for("OTHER").name(), "tag");
    }

    #[test]
    fn test_empty_entity_type_rejected() {
        let err = AnonymizationRules::default()
            .with_rule(" ", Operator::Redact)
            .unwrap_err();
        assert!(err.is_configuration_fault());
    }
}
