//! Context-word score enhancement
//!
//! Short numeric patterns are ambiguous on their own. When one of a
//! recognizer's context words appears within a few tokens of a match, the
//! match's score is raised by a fixed increment.
//!
//! Tokenization is script-aware so that unsegmented Japanese text still yields
//! useful tokens: runs of alphanumerics, Han ideographs, Hiragana and Katakana
//! each form one token, any other symbol is a token of its own, and whitespace
//! only separates.

use serde::{Deserialize, Serialize};

/// Default number of tokens inspected on each side of a match
pub const DEFAULT_CONTEXT_WINDOW: usize = 5;

/// Default score increment applied when a context word is found
pub const DEFAULT_CONTEXT_BOOST: f32 = 0.35;

/// Window and boost shared by every recognizer built from one configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextSettings {
    /// Tokens inspected before and after a match
    pub window: usize,
    /// Score increment (result capped at 1.0)
    pub boost: f32,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            window: DEFAULT_CONTEXT_WINDOW,
            boost: DEFAULT_CONTEXT_BOOST,
        }
    }
}

/// A token with its character range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Start character offset
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
    /// Token text
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Alnum,
    Han,
    Hiragana,
    Katakana,
    Symbol,
}

fn classify(c: char) -> CharClass {
    match c {
        c if c.is_whitespace() => CharClass::Space,
        '\u{3040}'..='\u{309F}' => CharClass::Hiragana,
        '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
            CharClass::Katakana
        }
        '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '\u{F900}'..='\u{FAFF}' | '々' => {
            CharClass::Han
        }
        c if c.is_alphanumeric() => CharClass::Alnum,
        _ => CharClass::Symbol,
    }
}

/// Split text into tokens with character offsets
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    // (char start, byte start, class) of the token being built
    let mut current: Option<(usize, usize, CharClass)> = None;

    for (char_pos, (byte_pos, c)) in text.char_indices().enumerate() {
        let class = classify(c);

        if let Some((start, byte_start, open)) = current {
            if open == class && class != CharClass::Symbol {
                continue;
            }
            tokens.push(Token {
                start,
                end: char_pos,
                text: &text[byte_start..byte_pos],
            });
            current = None;
        }

        if class != CharClass::Space {
            current = Some((char_pos, byte_pos, class));
        }
    }

    if let Some((start, byte_start, _)) = current {
        tokens.push(Token {
            start,
            end: text.chars().count(),
            text: &text[byte_start..],
        });
    }

    tokens
}

/// Boosts scores of matches surrounded by configured context words
#[derive(Debug, Clone)]
pub struct ContextEnhancer {
    words: Vec<String>,
    settings: ContextSettings,
}

impl ContextEnhancer {
    /// Create an enhancer; words are matched case-insensitively
    pub fn new(words: &[String], settings: ContextSettings) -> Self {
        let words = words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words, settings }
    }

    /// An enhancer that never boosts
    pub fn disabled() -> Self {
        Self {
            words: Vec::new(),
            settings: ContextSettings::default(),
        }
    }

    /// Whether any context word is configured
    pub fn is_enabled(&self) -> bool {
        !self.words.is_empty() && self.settings.window > 0
    }

    /// Configured context words (lowercased)
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Whether a context word occurs within the token window around `[start, end)`
    pub fn has_context(&self, tokens: &[Token<'_>], start: usize, end: usize) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let window = self.settings.window;
        let before: Vec<&Token<'_>> = tokens.iter().filter(|t| t.end <= start).collect();
        let before = &before[before.len().saturating_sub(window)..];
        let after = tokens.iter().filter(|t| t.start >= end).take(window);

        let prefix: String = before.iter().map(|t| t.text).collect::<String>().to_lowercase();
        let suffix: String = after.map(|t| t.text).collect::<String>().to_lowercase();

        self.words
            .iter()
            .any(|word| prefix.contains(word.as_str()) || suffix.contains(word.as_str()))
    }

    /// Apply the boost to `score` if the match has supporting context
    pub fn enhance(&self, tokens: &[Token<'_>], start: usize, end: usize, score: f32) -> f32 {
        if self.has_context(tokens, start, end) {
            (score + self.settings.boost).min(1.0)
        } else {
            score
        }
    }
}
