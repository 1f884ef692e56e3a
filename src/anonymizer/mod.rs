//! Anonymization module
//!
//! Turns resolved spans into redacted text:
//! - **Operators**: tag, replace, redact, mask, hash and custom functions
//! - **Rules**: per-entity-type operator table with a default
//! - **Rewriter**: offset-safe splicing plus an audit trail

pub mod operator;
pub mod rewriter;
pub mod rules;

pub use operator::{hash_value, Operator, OperatorConfig};
pub use rewriter::{AuditEntry, Rewriter};
pub use rules::{AnonymizationRules, RulesConfig};
