//! Predefined-format recognizers
//!
//! Pattern recognizers with format-specific validation layered on top of the
//! baseline match. Matches that fail validation are dropped outright.

pub mod credit_card;
pub mod email;
pub mod phone;

pub use credit_card::CREDIT_CARD_ENTITY;
pub use email::EMAIL_ENTITY;
pub use phone::PHONE_ENTITY;

/// Use `configured` context words, or the format's defaults when none are given
pub(crate) fn context_words(configured: &[String], defaults: &[&str]) -> Vec<String> {
    if configured.is_empty() {
        defaults.iter().map(|w| w.to_string()).collect()
    } else {
        configured.to_vec()
    }
}
