//! Core domain types
//!
//! - [`span`] - candidates and resolved spans
//! - [`text`] - character/byte offset conversion
//! - [`errors`] - error taxonomy
//! - [`result`] - `Result` alias

pub mod errors;
pub mod result;
pub mod span;
pub mod text;

pub use errors::ScrubError;
pub use result::Result;
pub use span::{spans_overlap, Candidate, ResolvedSpan, ResolvedSpans, DENY_ENTITY};
pub use text::CharIndex;
