//! Text navigation helpers.
//!
//! Line boundary lookups over any `TextBuffer`, and byte/char offset mapping
//! for regex matches run over a `&str` copy of a range.

use std::ops::Range;

use crate::text::TextBuffer;

/// Find start of line containing offset.
pub fn find_line_start<T: TextBuffer + ?Sized>(text: &T, offset: usize) -> usize {
    text.line_range(offset).start
}

/// Find end of line containing offset (position of newline or end of doc).
pub fn find_line_end<T: TextBuffer + ?Sized>(text: &T, offset: usize) -> usize {
    text.line_range(offset).end
}

/// Expand `range` to whole lines, including the trailing newline of the last line.
pub fn expand_to_lines<T: TextBuffer + ?Sized>(text: &T, range: Range<usize>) -> Range<usize> {
    let len = text.len_chars();
    let start = find_line_start(text, range.start.min(len));
    let mut end = find_line_end(text, range.end.max(range.start).min(len));
    if end < len {
        // Include the newline itself.
        end += 1;
    }
    start..end
}

/// Maps byte offsets within a string to char offsets.
///
/// Regexes report byte offsets; everything else in the editor speaks chars.
pub struct CharOffsets {
    /// Byte offset of every char boundary, plus the total length.
    boundaries: Vec<usize>,
}

impl CharOffsets {
    pub fn new(s: &str) -> Self {
        let mut boundaries: Vec<usize> = s.char_indices().map(|(i, _)| i).collect();
        boundaries.push(s.len());
        Self { boundaries }
    }

    /// Char offset of a byte offset that lies on a char boundary.
    pub fn char_of(&self, byte: usize) -> usize {
        self.boundaries.partition_point(|&b| b < byte)
    }

    pub fn char_range(&self, bytes: Range<usize>) -> Range<usize> {
        self.char_of(bytes.start)..self.char_of(bytes.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::EditorRope;

    #[test]
    fn test_line_start_end() {
        let rope = EditorRope::from_str("first\nsecond\nthird");
        assert_eq!(find_line_start(&rope, 8), 6);
        assert_eq!(find_line_end(&rope, 8), 12);
        assert_eq!(find_line_start(&rope, 0), 0);
        assert_eq!(find_line_end(&rope, 18), 18);
    }

    #[test]
    fn test_expand_to_lines() {
        let rope = EditorRope::from_str("first\nsecond\nthird");
        assert_eq!(expand_to_lines(&rope, 8..9), 6..13);
        assert_eq!(expand_to_lines(&rope, 2..8), 0..13);
        assert_eq!(expand_to_lines(&rope, 15..15), 13..18);
    }

    #[test]
    fn test_char_offsets() {
        let s = "añb🌍c";
        let offsets = CharOffsets::new(s);
        assert_eq!(offsets.char_of(0), 0);
        assert_eq!(offsets.char_of(1), 1);
        assert_eq!(offsets.char_of(3), 2);
        assert_eq!(offsets.char_of(4), 3);
        assert_eq!(offsets.char_of(8), 4);
        assert_eq!(offsets.char_of(9), 5);
        assert_eq!(offsets.char_range(3..8), 2..4);
    }
}
