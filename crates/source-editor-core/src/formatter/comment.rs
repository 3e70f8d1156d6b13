//! Comment formatter: `<!-- ... -->`, which may span lines.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::palette::Colors;
use crate::style::{Attributes, Color};
use crate::styled::StyledText;
use crate::syntax::Construct;
use crate::text_helpers::CharOffsets;

use super::{Formatter, Scan, mark};

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));

pub struct CommentFormatter {
    color: Color,
}

impl CommentFormatter {
    pub fn new(colors: &Colors) -> Self {
        Self {
            color: colors.gray_foreground,
        }
    }
}

impl Formatter for CommentFormatter {
    fn name(&self) -> &'static str {
        "comment"
    }

    fn add_syntax_highlighting(&self, text: &mut StyledText, range: Range<usize>) {
        let scan = Scan::new(text, range);
        for m in COMMENT.find_iter(scan.source()) {
            mark(text, scan.chars(m.range()), Construct::Comment, Some(self.color));
        }
    }

    /// Comments are the one construct that spans lines. A pass over part of
    /// one must cover all of it: the comment as the text now reads, and the
    /// comment flagged by the previous pass, which an edit may have broken.
    fn affected_range(&self, text: &StyledText, range: Range<usize>) -> Range<usize> {
        let mut range = flagged_extent(text, range);
        let source = text.to_string();
        let offsets = CharOffsets::new(&source);
        for m in COMMENT.find_iter(&source) {
            let comment = offsets.char_range(m.range());
            if comment.start >= range.end {
                break;
            }
            if comment.end >= range.start {
                range.start = range.start.min(comment.start);
                range.end = range.end.max(comment.end);
            }
        }
        range
    }

    fn constructs(&self) -> &'static [Construct] {
        &[Construct::Comment]
    }
}

/// Grow `range` over comment-flagged runs on either side of it.
fn flagged_extent(text: &StyledText, mut range: Range<usize>) -> Range<usize> {
    let is_comment = |attrs: &Attributes| attrs.constructs.contains(Construct::Comment);
    let runs = text.runs();

    let before = runs.partition_point(|run| run.range.end <= range.start);
    for run in runs[..before].iter().rev() {
        if run.range.end < range.start || !is_comment(&run.attributes) {
            break;
        }
        range.start = run.range.start;
    }

    let after = runs.partition_point(|run| run.range.start < range.end);
    for run in &runs[after..] {
        if run.range.start > range.end || !is_comment(&run.attributes) {
            break;
        }
        range.end = run.range.end;
    }
    range
}
