//! Styled text: a rope plus per-range presentation attributes.
//!
//! Attribute runs are kept sorted, contiguous and covering the whole text, so
//! every character resolves to exactly one `Attributes` value. Adjacent runs
//! with equal attributes are coalesced after every mutation.

use std::fmt;
use std::ops::Range;

use smol_str::SmolStr;

use crate::style::Attributes;
use crate::text::{EditorRope, TextBuffer};

/// A run of characters sharing the same attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRun {
    pub range: Range<usize>,
    pub attributes: Attributes,
}

/// Text with attached attributes.
#[derive(Clone, Default)]
pub struct StyledText {
    text: EditorRope,
    runs: Vec<AttributeRun>,
    /// Union of edited ranges (post-edit coordinates) since the last `take_dirty`.
    dirty: Option<Range<usize>>,
}

impl StyledText {
    /// Create styled text where every character has `attributes`.
    pub fn new(text: &str, attributes: Attributes) -> Self {
        let text = EditorRope::from_str(text);
        let len = text.len_chars();
        let runs = if len > 0 {
            vec![AttributeRun {
                range: 0..len,
                attributes,
            }]
        } else {
            Vec::new()
        };
        Self {
            text,
            runs,
            dirty: None,
        }
    }

    pub fn from_str(text: &str) -> Self {
        Self::new(text, Attributes::default())
    }

    pub fn text(&self) -> &EditorRope {
        &self.text
    }

    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        self.text.slice(range)
    }

    pub fn to_string(&self) -> String {
        self.text.to_string()
    }

    pub fn runs(&self) -> &[AttributeRun] {
        &self.runs
    }

    /// Clamp a range to the text, keeping it well-formed.
    pub fn clamp_range(&self, range: Range<usize>) -> Range<usize> {
        let len = self.len_chars();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        start..end
    }

    fn run_index_at(&self, pos: usize) -> Option<usize> {
        let idx = self.runs.partition_point(|run| run.range.end <= pos);
        (idx < self.runs.len() && self.runs[idx].range.start <= pos).then_some(idx)
    }

    /// Attributes of the character at `pos`.
    pub fn attributes_at(&self, pos: usize) -> Option<&Attributes> {
        self.run_index_at(pos).map(|idx| &self.runs[idx].attributes)
    }

    /// Runs overlapping `range`, clipped to it.
    pub fn runs_in(&self, range: Range<usize>) -> impl Iterator<Item = (Range<usize>, &Attributes)> {
        let Range { start, end } = self.clamp_range(range);
        let first = self.runs.partition_point(|run| run.range.end <= start);
        self.runs[first..]
            .iter()
            .take_while(move |run| run.range.start < end)
            .map(move |run| {
                (
                    run.range.start.max(start)..run.range.end.min(end),
                    &run.attributes,
                )
            })
    }

    /// Apply `f` to the attributes of every character in `range`.
    pub fn update_attributes(&mut self, range: Range<usize>, mut f: impl FnMut(&mut Attributes)) {
        let range = self.clamp_range(range);
        if range.is_empty() {
            return;
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        for run in &mut self.runs[first..last] {
            f(&mut run.attributes);
        }
        self.coalesce();
    }

    /// Replace the attributes of every character in `range`.
    pub fn set_attributes(&mut self, range: Range<usize>, attributes: &Attributes) {
        self.update_attributes(range, |attrs| *attrs = attributes.clone());
    }

    /// Replace `range` with `text`.
    ///
    /// The inserted characters take the attributes of the first replaced
    /// character, or of the preceding character for a pure insertion (the
    /// following one at offset 0). Find-and-replace markers are not inherited.
    pub fn replace(&mut self, range: Range<usize>, text: &str) {
        let range = self.clamp_range(range);
        let inserted_len = text.chars().count();

        let mut inherited = self.inherited_attributes(&range);
        inherited.find_match = None;

        // Drop the replaced runs and pull everything after them back.
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        self.runs.drain(first..last);
        let removed = range.len();
        for run in &mut self.runs[first..] {
            run.range.start -= removed;
            run.range.end -= removed;
        }

        if inserted_len > 0 {
            let at = self.split_at(range.start);
            for run in &mut self.runs[at..] {
                run.range.start += inserted_len;
                run.range.end += inserted_len;
            }
            self.runs.insert(
                at,
                AttributeRun {
                    range: range.start..range.start + inserted_len,
                    attributes: inherited,
                },
            );
        }

        self.text.replace(range.clone(), text);
        self.coalesce();
        self.note_edit(range.start, removed, inserted_len);
    }

    pub fn insert(&mut self, offset: usize, text: &str) {
        self.replace(offset..offset, text);
    }

    pub fn delete(&mut self, range: Range<usize>) {
        self.replace(range, "");
    }

    /// Copy of `range` with its attributes, re-based to start at 0.
    pub fn substring(&self, range: Range<usize>) -> StyledText {
        let range = self.clamp_range(range);
        let text = self
            .text
            .rope_slice(range.clone())
            .map(|slice| EditorRope::from(slice.to_string()))
            .unwrap_or_default();
        let runs = self
            .runs_in(range.clone())
            .map(|(run_range, attributes)| AttributeRun {
                range: run_range.start - range.start..run_range.end - range.start,
                attributes: attributes.clone(),
            })
            .collect();
        StyledText {
            text,
            runs,
            dirty: None,
        }
    }

    /// Take the accumulated edited range, leaving none behind.
    pub fn take_dirty(&mut self) -> Option<Range<usize>> {
        self.dirty.take()
    }

    pub fn dirty(&self) -> Option<&Range<usize>> {
        self.dirty.as_ref()
    }

    /// Record that `range` needs re-highlighting without editing text.
    ///
    /// Used for find markers, which change attributes the chain reads.
    pub fn mark_dirty(&mut self, range: Range<usize>) {
        let range = self.clamp_range(range);
        self.dirty = Some(match self.dirty.take() {
            Some(previous) => previous.start.min(range.start)..previous.end.max(range.end),
            None => range,
        });
    }

    fn inherited_attributes(&self, range: &Range<usize>) -> Attributes {
        let source = if !range.is_empty() {
            self.attributes_at(range.start)
        } else if range.start > 0 {
            self.attributes_at(range.start - 1)
        } else {
            self.attributes_at(range.end)
        };
        source.cloned().unwrap_or_default()
    }

    /// Ensure a run boundary at `pos`; returns the index of the run starting there.
    fn split_at(&mut self, pos: usize) -> usize {
        let Some(idx) = self.run_index_at(pos) else {
            return self.runs.len();
        };
        let run = &mut self.runs[idx];
        if run.range.start == pos {
            return idx;
        }
        let tail = AttributeRun {
            range: pos..run.range.end,
            attributes: run.attributes.clone(),
        };
        run.range.end = pos;
        self.runs.insert(idx + 1, tail);
        idx + 1
    }

    fn coalesce(&mut self) {
        self.runs.retain(|run| !run.range.is_empty());
        self.runs.dedup_by(|next, prev| {
            if prev.attributes == next.attributes {
                prev.range.end = next.range.end;
                true
            } else {
                false
            }
        });
    }

    fn note_edit(&mut self, start: usize, removed: usize, inserted: usize) {
        let map = |pos: usize| {
            if pos <= start {
                pos
            } else if pos >= start + removed {
                pos - removed + inserted
            } else {
                start + inserted
            }
        };
        let edited = start..start + inserted;
        self.dirty = Some(match self.dirty.take() {
            Some(previous) => {
                map(previous.start).min(edited.start)..map(previous.end).max(edited.end)
            }
            None => edited,
        });
    }
}

impl PartialEq for StyledText {
    fn eq(&self, other: &Self) -> bool {
        self.runs == other.runs && self.text.rope() == other.text.rope()
    }
}

impl fmt::Debug for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyledText")
            .field("text", &self.to_string())
            .field("runs", &self.runs)
            .finish()
    }
}

impl From<&str> for StyledText {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, MatchHighlight};

    fn red() -> Attributes {
        Attributes {
            foreground: Color::rgb(0xff, 0, 0),
            ..Attributes::default()
        }
    }

    fn assert_well_formed(text: &StyledText) {
        let mut expected_start = 0;
        for pair in text.runs().windows(2) {
            assert_ne!(pair[0].attributes, pair[1].attributes, "runs not coalesced");
        }
        for run in text.runs() {
            assert_eq!(run.range.start, expected_start);
            assert!(!run.range.is_empty());
            expected_start = run.range.end;
        }
        assert_eq!(expected_start, text.len_chars());
    }

    #[test]
    fn test_update_splits_and_coalesces() {
        let mut text = StyledText::from_str("hello world");
        text.set_attributes(2..5, &red());
        assert_eq!(text.runs().len(), 3);
        assert_eq!(text.attributes_at(1), Some(&Attributes::default()));
        assert_eq!(text.attributes_at(2), Some(&red()));
        assert_eq!(text.attributes_at(5), Some(&Attributes::default()));
        assert_well_formed(&text);

        text.set_attributes(0..11, &Attributes::default());
        assert_eq!(text.runs().len(), 1);
        assert_well_formed(&text);
    }

    #[test]
    fn test_runs_in_clips() {
        let mut text = StyledText::from_str("abcdef");
        text.set_attributes(2..4, &red());
        let runs: Vec<_> = text.runs_in(3..5).map(|(r, _)| r).collect();
        assert_eq!(runs, vec![3..4, 4..5]);
        assert_eq!(text.runs_in(4..100).count(), 1);
        assert_eq!(text.runs_in(6..6).count(), 0);
    }

    #[test]
    fn test_replace_inherits_first_replaced_char() {
        let mut text = StyledText::from_str("a cat sat");
        text.set_attributes(2..5, &red());
        text.replace(2..5, "tiger");
        assert_eq!(text.to_string(), "a tiger sat");
        assert_eq!(text.attributes_at(2), Some(&red()));
        assert_eq!(text.attributes_at(6), Some(&red()));
        assert_eq!(text.attributes_at(7), Some(&Attributes::default()));
        assert_well_formed(&text);
    }

    #[test]
    fn test_insert_inherits_preceding_char() {
        let mut text = StyledText::from_str("ab");
        text.set_attributes(0..1, &red());
        text.insert(1, "xy");
        assert_eq!(text.to_string(), "axyb");
        assert_eq!(text.attributes_at(2), Some(&red()));
        assert_eq!(text.attributes_at(3), Some(&Attributes::default()));

        text.insert(0, "!");
        assert_eq!(text.attributes_at(0), Some(&red()));
        assert_well_formed(&text);
    }

    #[test]
    fn test_insert_does_not_inherit_match_marker() {
        let mut text = StyledText::from_str("cat");
        text.update_attributes(0..3, |attrs| attrs.find_match = Some(MatchHighlight::Selected));
        text.insert(3, "s");
        assert_eq!(text.attributes_at(3).unwrap().find_match, None);
    }

    #[test]
    fn test_delete_everything() {
        let mut text = StyledText::from_str("abc");
        text.delete(0..3);
        assert!(text.is_empty());
        assert!(text.runs().is_empty());
        text.insert(0, "new");
        assert_eq!(text.runs().len(), 1);
        assert_well_formed(&text);
    }

    #[test]
    fn test_substring_rebases_runs() {
        let mut text = StyledText::from_str("one\ntwo\n");
        text.set_attributes(5..6, &red());
        let line = text.substring(4..8);
        assert_eq!(line.to_string(), "two\n");
        assert_eq!(line.attributes_at(1), Some(&red()));
        assert_eq!(line.attributes_at(0), Some(&Attributes::default()));
        assert_well_formed(&line);
    }

    #[test]
    fn test_dirty_accumulates_across_edits() {
        let mut text = StyledText::from_str("0123456789");
        text.replace(2..4, "abc");
        assert_eq!(text.dirty(), Some(&(2..5)));
        // Edit after the dirty range extends it.
        text.insert(9, "z");
        assert_eq!(text.dirty(), Some(&(2..10)));
        // Edit before it shifts the old range and unions.
        text.delete(0..1);
        assert_eq!(text.take_dirty(), Some(0..9));
        assert_eq!(text.take_dirty(), None);
    }

    #[test]
    fn test_equality_covers_text_and_runs() {
        let a = StyledText::from_str("same");
        let mut b = StyledText::from_str("same");
        assert_eq!(a, b);
        b.set_attributes(0..1, &red());
        assert_ne!(a, b);
    }
}
