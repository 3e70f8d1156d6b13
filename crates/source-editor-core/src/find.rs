//! Find and replace session state.
//!
//! A `MatchSession` owns the match list for one search term and writes
//! `MatchHighlight` markers into the document it is handed. Every marker change
//! also marks the range dirty, so the storage restyles it when the enclosing
//! transaction commits.

use std::ops::Range;

use regex::RegexBuilder;

use crate::error::EditorError;
use crate::style::MatchHighlight;
use crate::styled::StyledText;
use crate::text_helpers::CharOffsets;
use crate::types::apply_delta;

/// Matches for one search term and the current match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSession {
    search_text: String,
    /// Non-overlapping char ranges in document order.
    matches: Vec<Range<usize>>,
    current: Option<usize>,
}

impl MatchSession {
    /// Search `text` and mark every match.
    ///
    /// No match is current until `next` or `previous` is called.
    pub fn start(text: &mut StyledText, search_text: &str) -> Result<Self, EditorError> {
        if search_text.is_empty() {
            return Err(EditorError::EmptySearch);
        }
        let matches = find_matches(&text.to_string(), search_text);
        for range in &matches {
            set_marker(text, range.clone(), Some(MatchHighlight::Match));
        }
        tracing::debug!(
            target: "source_editor::find",
            matches = matches.len(),
            "match session started"
        );
        Ok(Self {
            search_text: search_text.to_string(),
            matches,
            current: None,
        })
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn matches(&self) -> &[Range<usize>] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_match(&self) -> Option<Range<usize>> {
        self.current.and_then(|idx| self.matches.get(idx).cloned())
    }

    /// Make the next match current.
    ///
    /// With `after`, the next match is the first one starting at or after the
    /// end of `after`; otherwise the one following the current match. Both wrap
    /// from the last match to the first.
    pub fn next(&mut self, text: &mut StyledText, after: Option<Range<usize>>) -> Option<Range<usize>> {
        if self.matches.is_empty() {
            return None;
        }
        let idx = match (after, self.current) {
            (Some(after), _) => self
                .matches
                .iter()
                .position(|m| m.start >= after.end)
                .unwrap_or(0),
            (None, Some(current)) => (current + 1) % self.matches.len(),
            (None, None) => 0,
        };
        self.select(text, idx)
    }

    /// Make the previous match current, wrapping from the first to the last.
    pub fn previous(&mut self, text: &mut StyledText) -> Option<Range<usize>> {
        let last = self.matches.len().checked_sub(1)?;
        let idx = match self.current {
            Some(0) | None => last,
            Some(current) => current - 1,
        };
        self.select(text, idx)
    }

    /// Replace the current match and move on to the next one.
    ///
    /// Returns the range of the inserted text.
    pub fn replace_single(
        &mut self,
        text: &mut StyledText,
        replacement: &str,
    ) -> Result<Range<usize>, EditorError> {
        let idx = self.current.ok_or(EditorError::NoActiveMatch)?;
        if idx >= self.matches.len() {
            return Err(EditorError::NoActiveMatch);
        }
        let target = self.matches.remove(idx);
        let inserted = replace_marked(text, target.clone(), replacement);

        let delta = inserted.len() as isize - target.len() as isize;
        for later in &mut self.matches[idx..] {
            later.start = apply_delta(later.start, delta);
            later.end = apply_delta(later.end, delta);
        }

        tracing::debug!(
            target: "source_editor::find",
            start = target.start,
            end = target.end,
            remaining = self.matches.len(),
            "replaced current match"
        );

        self.current = None;
        if !self.matches.is_empty() {
            // The match after the replaced one now sits at `idx`.
            self.select(text, idx % self.matches.len());
        }
        Ok(inserted)
    }

    /// Replace every match in document order, returning how many were replaced.
    ///
    /// Earlier replacements shift later matches; each match is corrected by the
    /// running delta before it is used.
    pub fn replace_all(&mut self, text: &mut StyledText, replacement: &str) -> usize {
        let mut delta: isize = 0;
        let count = self.matches.len();
        for target in self.matches.drain(..) {
            let shifted = apply_delta(target.start, delta)..apply_delta(target.end, delta);
            let inserted = replace_marked(text, shifted, replacement);
            delta += inserted.len() as isize - target.len() as isize;
        }
        self.current = None;

        tracing::debug!(
            target: "source_editor::find",
            count,
            "replaced all matches"
        );
        count
    }

    /// Clear every find marker in `text`, including replaced-text markers.
    pub fn reset(&mut self, text: &mut StyledText) {
        clear_markers(text);
        self.matches.clear();
        self.current = None;
        tracing::debug!(target: "source_editor::find", "match session reset");
    }

    fn select(&mut self, text: &mut StyledText, idx: usize) -> Option<Range<usize>> {
        if let Some(previous) = self.current_match() {
            set_marker(text, previous, Some(MatchHighlight::Match));
        }
        let range = self.matches.get(idx)?.clone();
        set_marker(text, range.clone(), Some(MatchHighlight::Selected));
        self.current = Some(idx);

        tracing::trace!(
            target: "source_editor::find",
            index = idx,
            start = range.start,
            end = range.end,
            "current match"
        );
        Some(range)
    }
}

/// Case-insensitive literal matches of `needle` in `haystack`, as char ranges.
pub(crate) fn find_matches(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    if needle.is_empty() {
        return Vec::new();
    }
    let regex = match RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    {
        Ok(regex) => regex,
        Err(err) => {
            tracing::debug!(target: "source_editor::find", %err, "search pattern rejected");
            return Vec::new();
        }
    };
    let offsets = CharOffsets::new(haystack);
    regex
        .find_iter(haystack)
        .map(|m| offsets.char_range(m.range()))
        .collect()
}

/// Remove every find marker from `text`.
pub(crate) fn clear_markers(text: &mut StyledText) {
    let len = text.len_chars();
    let marked: Vec<Range<usize>> = text
        .runs_in(0..len)
        .filter(|(_, attrs)| attrs.find_match.is_some())
        .map(|(range, _)| range)
        .collect();
    for range in marked {
        set_marker(text, range, None);
    }
}

fn set_marker(text: &mut StyledText, range: Range<usize>, highlight: Option<MatchHighlight>) {
    text.update_attributes(range.clone(), |attrs| attrs.find_match = highlight);
    text.mark_dirty(range);
}

fn replace_marked(text: &mut StyledText, range: Range<usize>, replacement: &str) -> Range<usize> {
    text.replace(range.clone(), replacement);
    let inserted = range.start..range.start + replacement.chars().count();
    set_marker(text, inserted.clone(), Some(MatchHighlight::Replaced));
    inserted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_at(text: &StyledText, pos: usize) -> Option<MatchHighlight> {
        text.attributes_at(pos).and_then(|attrs| attrs.find_match)
    }

    #[test]
    fn test_find_matches_is_case_insensitive_literal() {
        assert_eq!(find_matches("Cat cAT cat", "cat"), vec![0..3, 4..7, 8..11]);
        assert_eq!(find_matches("a.b axb", "a.b"), vec![0..3]);
        assert_eq!(find_matches("añcat", "cat"), vec![2..5]);
        assert!(find_matches("abc", "").is_empty());
    }

    #[test]
    fn test_matches_do_not_overlap() {
        assert_eq!(find_matches("aaaa", "aa"), vec![0..2, 2..4]);
        assert_eq!(find_matches("aaa", "aa"), vec![0..2]);
    }

    #[test]
    fn test_empty_search_is_rejected() {
        let mut text = StyledText::from_str("cat");
        assert_eq!(MatchSession::start(&mut text, ""), Err(EditorError::EmptySearch));
        assert!(text.runs().iter().all(|run| run.attributes.find_match.is_none()));
        assert!(text.dirty().is_none());
    }

    #[test]
    fn test_start_marks_matches() {
        let mut text = StyledText::from_str("the cat sat on the cat mat");
        let session = MatchSession::start(&mut text, "cat").unwrap();
        assert_eq!(session.matches(), &[4..7, 19..22]);
        assert_eq!(session.current_match(), None);
        assert_eq!(marker_at(&text, 4), Some(MatchHighlight::Match));
        assert_eq!(marker_at(&text, 8), None);
        assert_eq!(text.dirty(), Some(&(4..22)));
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let mut text = StyledText::from_str("the cat sat on the cat mat");
        let mut session = MatchSession::start(&mut text, "cat").unwrap();

        assert_eq!(session.next(&mut text, Some(0..0)), Some(4..7));
        assert_eq!(marker_at(&text, 4), Some(MatchHighlight::Selected));
        assert_eq!(session.next(&mut text, None), Some(19..22));
        assert_eq!(marker_at(&text, 4), Some(MatchHighlight::Match));
        assert_eq!(session.next(&mut text, None), Some(4..7));

        assert_eq!(session.previous(&mut text), Some(19..22));
        assert_eq!(session.previous(&mut text), Some(4..7));
        assert_eq!(marker_at(&text, 19), Some(MatchHighlight::Match));
    }

    #[test]
    fn test_next_after_range() {
        let mut text = StyledText::from_str("cat cat cat");
        let mut session = MatchSession::start(&mut text, "cat").unwrap();
        assert_eq!(session.next(&mut text, Some(5..5)), Some(8..11));
        // Selection sitting on a match moves past it.
        assert_eq!(session.next(&mut text, Some(4..7)), Some(8..11));
        // Nothing after the caret wraps to the first match.
        assert_eq!(session.next(&mut text, Some(10..10)), Some(0..3));
    }

    #[test]
    fn test_no_matches() {
        let mut text = StyledText::from_str("dog");
        let mut session = MatchSession::start(&mut text, "cat").unwrap();
        assert!(session.is_empty());
        assert_eq!(session.next(&mut text, None), None);
        assert_eq!(session.previous(&mut text), None);
        assert_eq!(
            session.replace_single(&mut text, "x"),
            Err(EditorError::NoActiveMatch)
        );
    }

    #[test]
    fn test_replace_single_shifts_later_matches() {
        let mut text = StyledText::from_str("cat cat cat");
        let mut session = MatchSession::start(&mut text, "cat").unwrap();
        session.next(&mut text, None);

        let inserted = session.replace_single(&mut text, "tiger").unwrap();
        assert_eq!(inserted, 0..5);
        assert_eq!(text.to_string(), "tiger cat cat");
        assert_eq!(session.matches(), &[6..9, 10..13]);
        assert_eq!(session.current_match(), Some(6..9));
        assert_eq!(marker_at(&text, 0), Some(MatchHighlight::Replaced));
        assert_eq!(marker_at(&text, 6), Some(MatchHighlight::Selected));
    }

    #[test]
    fn test_replace_single_last_match_wraps() {
        let mut text = StyledText::from_str("cat cat");
        let mut session = MatchSession::start(&mut text, "cat").unwrap();
        session.previous(&mut text);
        session.replace_single(&mut text, "ox").unwrap();
        assert_eq!(text.to_string(), "cat ox");
        assert_eq!(session.current_match(), Some(0..3));

        session.replace_single(&mut text, "ox").unwrap();
        assert_eq!(text.to_string(), "ox ox");
        assert!(session.is_empty());
        assert_eq!(session.current_match(), None);
    }

    #[test]
    fn test_replace_all() {
        let mut text = StyledText::from_str("cat cat cat");
        let mut session = MatchSession::start(&mut text, "cat").unwrap();
        let expected = session.len();

        assert_eq!(session.replace_all(&mut text, "dog"), expected);
        assert_eq!(text.to_string(), "dog dog dog");
        assert_eq!(text.len_chars(), 11);
        assert!(session.is_empty());
    }

    #[test]
    fn test_replace_all_abutting_matches_with_length_change() {
        for (replacement, expected) in [("b", "bb"), ("", ""), ("xyz", "xyzxyz")] {
            let mut text = StyledText::from_str("aaaa");
            let mut session = MatchSession::start(&mut text, "aa").unwrap();
            assert_eq!(session.replace_all(&mut text, replacement), 2);
            assert_eq!(text.to_string(), expected);
        }
    }

    #[test]
    fn test_replace_all_replacement_contains_search_text() {
        let mut text = StyledText::from_str("a-a");
        let mut session = MatchSession::start(&mut text, "a").unwrap();
        assert_eq!(session.replace_all(&mut text, "aa"), 2);
        assert_eq!(text.to_string(), "aa-aa");
    }

    #[test]
    fn test_reset_clears_all_markers_and_is_idempotent() {
        let mut text = StyledText::from_str("cat cat cat");
        let mut session = MatchSession::start(&mut text, "cat").unwrap();
        session.next(&mut text, None);
        session.replace_single(&mut text, "dog").unwrap();

        session.reset(&mut text);
        assert!(text.runs().iter().all(|run| run.attributes.find_match.is_none()));
        assert!(session.is_empty());
        let snapshot = text.clone();
        session.reset(&mut text);
        assert_eq!(text, snapshot);
    }
}
