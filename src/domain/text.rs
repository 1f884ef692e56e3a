//! Character offset index
//!
//! Spans are expressed in characters (Unicode scalar values) everywhere in the
//! pipeline. Regex engines and `String` splicing work on byte offsets, so every
//! conversion between the two goes through [`CharIndex`].

use std::ops::Range;

/// Byte/character offset mapping for one text
#[derive(Debug, Clone)]
pub struct CharIndex<'a> {
    text: &'a str,
    /// Byte offset of every character, followed by `text.len()`
    offsets: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    /// Build the index for a text
    pub fn new(text: &'a str) -> Self {
        let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        offsets.push(text.len());
        Self { text, offsets }
    }

    /// The indexed text
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Length of the text in characters
    pub fn char_len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Byte offset of a character position (`char_len()` maps to the end)
    pub fn byte_offset(&self, char_pos: usize) -> Option<usize> {
        self.offsets.get(char_pos).copied()
    }

    /// Character position of a byte offset, if it lies on a character boundary
    pub fn char_offset(&self, byte_pos: usize) -> Option<usize> {
        self.offsets.binary_search(&byte_pos).ok()
    }

    /// Convert a byte range into a character range
    pub fn char_range(&self, bytes: Range<usize>) -> Option<Range<usize>> {
        Some(self.char_offset(bytes.start)?..self.char_offset(bytes.end)?)
    }

    /// Convert a character range into a byte range
    pub fn byte_range(&self, chars: Range<usize>) -> Option<Range<usize>> {
        if chars.start > chars.end {
            return None;
        }
        Some(self.byte_offset(chars.start)?..self.byte_offset(chars.end)?)
    }

    /// Substring covered by a character range
    pub fn slice(&self, chars: Range<usize>) -> Option<&'a str> {
        let bytes = self.byte_range(chars)?;
        self.text.get(bytes)
    }
}
