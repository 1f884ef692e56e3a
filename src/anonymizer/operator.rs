//! Anonymization operators
//!
//! An operator maps the original substring of a resolved span to the text
//! spliced in its place. Every operator is deterministic.

use crate::domain::{Result, ScrubError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// Default masking character
pub const DEFAULT_MASKING_CHAR: char = '*';

/// Replacement function supplied from code
pub type CustomFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Runtime operator
#[derive(Clone, Default)]
pub enum Operator {
    /// `<ENTITY_TYPE>`
    #[default]
    Tag,
    /// Fixed placeholder
    Replace(String),
    /// Remove the span entirely
    Redact,
    /// Overwrite up to `chars_to_mask` characters
    Mask {
        masking_char: char,
        chars_to_mask: usize,
        from_end: bool,
    },
    /// SHA-256 hex digest of the original substring
    Hash,
    /// Arbitrary function of the original substring
    Custom(CustomFn),
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag => write!(f, "Tag"),
            Self::Replace(value) => f.debug_tuple("Replace").field(value).finish(),
            Self::Redact => write!(f, "Redact"),
            Self::Mask {
                masking_char,
                chars_to_mask,
                from_end,
            } => f
                .debug_struct("Mask")
                .field("masking_char", masking_char)
                .field("chars_to_mask", chars_to_mask)
                .field("from_end", from_end)
                .finish(),
            Self::Hash => write!(f, "Hash"),
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

impl Operator {
    /// Wrap a closure as a custom operator
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Operator name as used in configuration
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Replace(_) => "replace",
            Self::Redact => "redact",
            Self::Mask { .. } => "mask",
            Self::Hash => "hash",
            Self::Custom(_) => "custom",
        }
    }

    /// Replacement text for `original`, detected as `entity_type`
    pub fn apply(&self, entity_type: &str, original: &str) -> String {
        match self {
            Self::Tag => format!("<{entity_type}>"),
            Self::Replace(value) => value.clone(),
            Self::Redact => String::new(),
            Self::Mask {
                masking_char,
                chars_to_mask,
                from_end,
            } => mask(original, *masking_char, *chars_to_mask, *from_end),
            Self::Hash => hash_value(original),
            Self::Custom(f) => f(original),
        }
    }
}

fn mask(original: &str, masking_char: char, chars_to_mask: usize, from_end: bool) -> String {
    let len = original.chars().count();
    let masked = chars_to_mask.min(len);
    let (mask_from, mask_to) = if from_end {
        (len - masked, len)
    } else {
        (0, masked)
    };

    original
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if (mask_from..mask_to).contains(&i) {
                masking_char
            } else {
                c
            }
        })
        .collect()
}

/// SHA-256 hex digest
pub fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}

fn default_masking_char() -> char {
    DEFAULT_MASKING_CHAR
}

/// Operator as written in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperatorConfig {
    #[default]
    Tag,
    Replace {
        new_value: String,
    },
    Redact,
    Mask {
        #[serde(default = "default_masking_char")]
        masking_char: char,
        chars_to_mask: usize,
        #[serde(default)]
        from_end: bool,
    },
    Hash,
}

impl OperatorConfig {
    /// Validate and convert into a runtime operator
    ///
    /// `entity_type` names the rule in error messages.
    pub fn build(&self, entity_type: &str) -> Result<Operator> {
        match self {
            Self::Tag => Ok(Operator::Tag),
            Self::Replace { new_value } => Ok(Operator::Replace(new_value.clone())),
            Self::Redact => Ok(Operator::Redact),
            Self::Mask {
                masking_char,
                chars_to_mask,
                from_end,
            } => {
                if *chars_to_mask == 0 {
                    return Err(ScrubError::InvalidRule {
                        entity_type: entity_type.to_string(),
                        reason: "chars_to_mask must be greater than 0".to_string(),
                    });
                }
                Ok(Operator::Mask {
                    masking_char: *masking_char,
                    chars_to_mask: *chars_to_mask,
                    from_end: *from_end,
                })
            }
            Self::Hash => Ok(Operator::Hash),
        }
    }
}
