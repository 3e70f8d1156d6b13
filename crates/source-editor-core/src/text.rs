//! Text buffer abstraction for editor storage.
//!
//! The `TextBuffer` trait provides a common interface for plain text storage.
//! Styling lives one level up in [`StyledText`](crate::styled::StyledText),
//! which pairs a buffer with attribute runs.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;

/// A text buffer that supports efficient editing and offset conversion.
///
/// All offsets are in Unicode scalar values (chars), not bytes or UTF-16.
pub trait TextBuffer {
    /// Total length in chars (Unicode scalar values).
    fn len_chars(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Insert text at char offset.
    fn insert(&mut self, char_offset: usize, text: &str);

    /// Delete char range.
    fn delete(&mut self, char_range: Range<usize>);

    /// Replace char range with text.
    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.delete(char_range.clone());
        self.insert(char_range.start, text);
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    /// Get character at offset. Returns None if out of bounds.
    fn char_at(&self, char_offset: usize) -> Option<char>;

    /// Convert entire buffer to String.
    fn to_string(&self) -> String;

    /// Char range of the line containing `offset`, excluding the trailing newline.
    fn line_range(&self, offset: usize) -> Range<usize> {
        let len = self.len_chars();
        let offset = offset.min(len);

        let mut start = offset;
        while start > 0 {
            if let Some('\n') = self.char_at(start - 1) {
                break;
            }
            start -= 1;
        }

        let mut end = offset;
        while end < len {
            if let Some('\n') = self.char_at(end) {
                break;
            }
            end += 1;
        }

        start..end
    }
}

/// Ropey-backed text buffer.
///
/// Provides O(log n) editing operations and line lookups.
#[derive(Clone, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }

    /// Get a reference to the underlying rope (for advanced operations).
    pub fn rope(&self) -> &ropey::Rope {
        &self.rope
    }

    /// Get a rope slice for zero-copy iteration over chunks.
    pub fn rope_slice(&self, char_range: Range<usize>) -> Option<ropey::RopeSlice<'_>> {
        if char_range.start > char_range.end || char_range.end > self.rope.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range))
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.rope.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        self.rope.remove(char_range);
    }

    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.rope.remove(char_range.clone());
        self.rope.insert(char_range.start, text);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        self.rope_slice(char_range).map(|s| s.to_smolstr())
    }

    fn char_at(&self, char_offset: usize) -> Option<char> {
        if char_offset >= self.len_chars() {
            return None;
        }
        Some(self.rope.char(char_offset))
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }

    // Rope line index is O(log n); the default scans char by char.
    fn line_range(&self, offset: usize) -> Range<usize> {
        let offset = offset.min(self.rope.len_chars());
        let line_idx = self.rope.char_to_line(offset);
        let start = self.rope.line_to_char(line_idx);
        let line = self.rope.line(line_idx);
        let mut end = start + line.len_chars();
        if line.chars().last() == Some('\n') {
            end -= 1;
        }
        start..end
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EditorRope {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut rope = EditorRope::from_str("hello world");
        assert_eq!(rope.len_chars(), 11);
        assert_eq!(rope.to_string(), "hello world");

        rope.insert(5, " beautiful");
        assert_eq!(rope.to_string(), "hello beautiful world");

        rope.delete(5..15);
        assert_eq!(rope.to_string(), "hello world");
    }

    #[test]
    fn test_char_at() {
        let rope = EditorRope::from_str("hello");
        assert_eq!(rope.char_at(0), Some('h'));
        assert_eq!(rope.char_at(4), Some('o'));
        assert_eq!(rope.char_at(5), None);
    }

    #[test]
    fn test_slice() {
        let rope = EditorRope::from_str("hello world");
        assert_eq!(rope.slice(0..5).as_deref(), Some("hello"));
        assert_eq!(rope.slice(6..11).as_deref(), Some("world"));
        assert_eq!(rope.slice(0..100), None);
    }

    #[test]
    fn test_replace() {
        let mut rope = EditorRope::from_str("hello 🌍 world");
        rope.replace(8..13, "rust");
        assert_eq!(rope.to_string(), "hello 🌍 rust");
        assert_eq!(rope.len_chars(), 12);
    }

    #[test]
    fn test_line_range() {
        let rope = EditorRope::from_str("== A ==\n* item\n\nlast");
        assert_eq!(rope.line_range(0), 0..7);
        assert_eq!(rope.line_range(7), 0..7);
        assert_eq!(rope.line_range(8), 8..14);
        assert_eq!(rope.line_range(15), 15..15);
        assert_eq!(rope.line_range(18), 16..20);
        assert_eq!(rope.line_range(99), 16..20);
    }
}
