//! Audit logging module
//!
//! Append-only record of every processed text. Original values are stored
//! as SHA-256 hashes only.

pub mod logger;

pub use logger::AuditLogger;
