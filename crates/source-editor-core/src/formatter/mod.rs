//! Wikitext formatters and the ordered chain that runs them.
//!
//! Every formatter does two things: it styles the constructs it recognises
//! (fonts and colors from the palette) and it tags the matched characters with
//! construct flags. Styling depends on the palette and the highlighting toggle;
//! the flags do not, so detection works the same with highlighting off.

use std::ops::Range;

use crate::palette::Palette;
use crate::style::{Color, TextAlignment};
use crate::styled::StyledText;
use crate::syntax::{Construct, ConstructScope};
use crate::text::TextBuffer;
use crate::text_helpers::{CharOffsets, expand_to_lines, find_line_start};

mod base;
mod bold_italics;
mod comment;
mod find_replace;
mod heading;
mod link;
mod list;
mod reference;
mod tag;
mod template;

pub use base::BaseFormatter;
pub use bold_italics::BoldItalicsFormatter;
pub use comment::CommentFormatter;
pub use find_replace::FindAndReplaceFormatter;
pub use heading::HeadingFormatter;
pub use link::LinkFormatter;
pub use list::ListFormatter;
pub use reference::ReferenceFormatter;
pub use tag::TagFormatter;
pub use template::TemplateFormatter;

/// A unit that styles and detects one kind of wikitext construct.
pub trait Formatter {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Style the constructs found in `range` of `text`.
    ///
    /// `range` always starts at a line start; the chain guarantees it.
    fn add_syntax_highlighting(&self, text: &mut StyledText, range: Range<usize>);

    /// Widen a line-aligned restyle range to cover every construct of this
    /// kind it touches, so a partial pass never splits one.
    ///
    /// Only constructs that can span lines need to override this.
    fn affected_range(&self, _text: &StyledText, range: Range<usize>) -> Range<usize> {
        range
    }

    /// Constructs this formatter can detect.
    fn constructs(&self) -> &'static [Construct] {
        &[]
    }

    /// Whether `construct` is present for a selection of `range`.
    fn is_present(&self, text: &StyledText, range: Range<usize>, construct: Construct) -> bool {
        self.constructs().contains(&construct) && construct_in_range(text, range, construct)
    }
}

/// Check a selection against the construct flags written by a formatter pass.
///
/// Inline constructs: a non-empty selection matches when any selected character
/// carries the flag; a caret matches on the character after it or the one just
/// before it (caret resting against a closing delimiter). Line constructs: the
/// line containing the selection start must carry the flag.
pub fn construct_in_range(text: &StyledText, range: Range<usize>, construct: Construct) -> bool {
    if range.start > text.len_chars() {
        return false;
    }
    let range = text.clamp_range(range);
    let flagged = |pos: usize| {
        text.attributes_at(pos)
            .is_some_and(|attrs| attrs.constructs.contains(construct))
    };

    match construct.scope() {
        ConstructScope::Line => flagged(text.text().line_range(range.start).start),
        ConstructScope::Inline if range.is_empty() => {
            flagged(range.start) || (range.start > 0 && flagged(range.start - 1))
        }
        ConstructScope::Inline => text
            .runs_in(range)
            .any(|(_, attrs)| attrs.constructs.contains(construct)),
    }
}

/// An ordered, immutable list of formatters built from one palette.
///
/// Chains are never edited in place: a palette change builds a new chain with
/// the next generation number and swaps it in whole.
pub struct FormatterChain {
    formatters: Vec<Box<dyn Formatter>>,
    generation: u64,
}

impl FormatterChain {
    /// Build the standard wikitext chain.
    ///
    /// Base formatter first, find-and-replace last so match highlighting is
    /// never hidden by syntax colors.
    pub fn new(
        palette: &Palette,
        syntax_highlighting_enabled: bool,
        alignment: TextAlignment,
        generation: u64,
    ) -> Self {
        let resolved = palette.resolve(syntax_highlighting_enabled);
        let colors = &resolved.colors;
        let fonts = &resolved.fonts;

        let formatters: Vec<Box<dyn Formatter>> = vec![
            Box::new(BaseFormatter::new(colors, fonts, alignment)),
            Box::new(TemplateFormatter::new(colors)),
            Box::new(BoldItalicsFormatter::new(colors, fonts)),
            Box::new(ReferenceFormatter::new(colors)),
            Box::new(ListFormatter::new(colors)),
            Box::new(HeadingFormatter::new(colors, fonts)),
            Box::new(TagFormatter::strikethrough(colors)),
            Box::new(TagFormatter::superscript(colors)),
            Box::new(TagFormatter::subscript(colors)),
            Box::new(TagFormatter::underline(colors)),
            Box::new(LinkFormatter::new(colors)),
            Box::new(CommentFormatter::new(colors)),
            Box::new(FindAndReplaceFormatter::new(colors)),
        ];

        tracing::debug!(
            target: "source_editor::chain",
            generation,
            syntax_highlighting_enabled,
            formatters = formatters.len(),
            "formatter chain built"
        );

        Self {
            formatters,
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    pub fn formatters(&self) -> impl Iterator<Item = &dyn Formatter> {
        self.formatters.iter().map(|f| f.as_ref())
    }

    /// Run every formatter over `range`, widened to whole lines and to any
    /// multi-line construct it touches.
    pub fn apply(&self, text: &mut StyledText, range: Range<usize>) {
        let range = self.affected_range(text, range);
        if range.is_empty() {
            return;
        }
        if tracing::enabled!(target: "source_editor::chain", tracing::Level::TRACE) {
            tracing::trace!(
                target: "source_editor::chain",
                generation = self.generation,
                start = range.start,
                end = range.end,
                "applying syntax highlighting"
            );
        }
        for formatter in &self.formatters {
            formatter.add_syntax_highlighting(text, range.clone());
        }
    }

    /// The range a pass over `range` actually restyles.
    ///
    /// Computed from the flags of the previous pass as well as the current
    /// text, so a construct that an edit shrank or broke is cleared in full.
    pub fn affected_range(&self, text: &StyledText, range: Range<usize>) -> Range<usize> {
        let range = expand_to_lines(text.text(), range);
        let widened = self
            .formatters
            .iter()
            .fold(range.clone(), |acc, f| f.affected_range(text, acc));
        let start = find_line_start(text.text(), widened.start.min(range.start));
        let end = if widened.end > range.end {
            // Finish the line the widened range ends on.
            expand_to_lines(text.text(), widened.end - 1..widened.end - 1).end
        } else {
            range.end
        };
        start..end
    }

    /// Whether any formatter in the chain reports `construct` for the selection.
    pub fn is_present(&self, text: &StyledText, range: Range<usize>, construct: Construct) -> bool {
        self.formatters
            .iter()
            .any(|f| f.is_present(text, range.clone(), construct))
    }
}

impl std::fmt::Debug for FormatterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterChain")
            .field("generation", &self.generation)
            .field(
                "formatters",
                &self.formatters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A `&str` copy of a text range for regex scanning.
///
/// Matched spans can be masked out so later patterns skip them (bold before
/// italics, nested links before simple links).
pub(crate) struct Scan {
    source: String,
    offsets: CharOffsets,
    base: usize,
}

impl Scan {
    pub(crate) fn new(text: &StyledText, range: Range<usize>) -> Self {
        let source = text.slice(range.clone()).unwrap_or_default().to_string();
        let offsets = CharOffsets::new(&source);
        Self {
            source,
            offsets,
            base: range.start,
        }
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    /// Document char range of a byte range in the scanned source.
    pub(crate) fn chars(&self, bytes: Range<usize>) -> Range<usize> {
        let local = self.offsets.char_range(bytes);
        local.start + self.base..local.end + self.base
    }

    /// Blank out a matched byte range so no later pattern sees it.
    pub(crate) fn mask(&mut self, bytes: Range<usize>) {
        let blank = " ".repeat(bytes.len());
        self.source.replace_range(bytes, &blank);
    }
}

/// Flag `range` with `construct` and optionally recolor it.
pub(crate) fn mark(text: &mut StyledText, range: Range<usize>, construct: Construct, color: Option<Color>) {
    text.update_attributes(range, |attrs| {
        attrs.constructs.insert(construct);
        if let Some(color) = color {
            attrs.foreground = color;
        }
    });
}

pub(crate) fn recolor(text: &mut StyledText, range: Range<usize>, color: Color) {
    text.update_attributes(range, |attrs| attrs.foreground = color);
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::ops::Range;

    use crate::palette::Palette;
    use crate::style::TextAlignment;
    use crate::styled::StyledText;

    use super::FormatterChain;

    pub fn chain(syntax_highlighting_enabled: bool) -> FormatterChain {
        FormatterChain::new(&Palette::default(), syntax_highlighting_enabled, TextAlignment::Natural, 1)
    }

    pub fn highlighted(source: &str) -> StyledText {
        let mut text = StyledText::from_str(source);
        let len = text.len_chars();
        chain(true).apply(&mut text, 0..len);
        text
    }

    /// Char range of the first occurrence of `needle`.
    pub fn find(source: &str, needle: &str) -> Range<usize> {
        let byte = source.find(needle).expect("needle present");
        let start = source[..byte].chars().count();
        start..start + needle.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{chain, find, highlighted};
    use super::*;
    use crate::style::Attributes;

    #[test]
    fn test_chain_order() {
        let chain = chain(true);
        let names: Vec<_> = chain.formatters().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec![
                "base",
                "template",
                "bold_italics",
                "reference",
                "list",
                "heading",
                "strikethrough",
                "superscript",
                "subscript",
                "underline",
                "link",
                "comment",
                "find_and_replace",
            ]
        );
    }

    #[test]
    fn test_inline_detection_with_caret() {
        let source = "plain '''bold''' plain";
        let text = highlighted(source);
        let bold = find(source, "'''bold'''");

        assert!(construct_in_range(&text, bold.start + 4..bold.start + 4, Construct::Bold));
        // Resting right after the closing delimiter.
        assert!(construct_in_range(&text, bold.end..bold.end, Construct::Bold));
        assert!(!construct_in_range(&text, bold.end + 1..bold.end + 1, Construct::Bold));
        assert!(!construct_in_range(&text, 0..0, Construct::Bold));
    }

    #[test]
    fn test_inline_detection_with_overlap() {
        let source = "plain '''bold''' plain";
        let text = highlighted(source);
        let bold = find(source, "'''bold'''");

        assert!(construct_in_range(&text, 0..bold.start + 1, Construct::Bold));
        assert!(!construct_in_range(&text, 0..bold.start, Construct::Bold));
    }

    #[test]
    fn test_out_of_bounds_is_not_present() {
        let text = highlighted("'''bold'''");
        assert!(!construct_in_range(&text, 50..60, Construct::Bold));
    }

    #[test]
    fn test_apply_expands_to_lines() {
        let source = "first line\n== Heading ==\nlast";
        let mut text = StyledText::from_str(source);
        let heading = find(source, "Heading");
        chain(true).apply(&mut text, heading.start + 1..heading.start + 2);

        let line_start = find(source, "==").start;
        assert!(text.attributes_at(line_start).unwrap().constructs.contains(Construct::Heading));
        // Lines outside the widened range are untouched.
        assert_eq!(text.attributes_at(0), Some(&Attributes::default()));
    }

    #[test]
    fn test_partial_pass_keeps_multiline_comment() {
        let source = "<!-- one\ncat two -->\nafter";
        let mut text = highlighted(source);
        let cat = find(source, "cat");
        let two = find(source, "two");

        assert_eq!(chain(true).affected_range(&text, cat.clone()), 0..21);
        chain(true).apply(&mut text, cat);
        assert!(construct_in_range(&text, two, Construct::Comment));
        assert!(construct_in_range(&text, 0..1, Construct::Comment));
        assert!(!construct_in_range(&text, find(source, "after"), Construct::Comment));
    }

    #[test]
    fn test_partial_pass_clears_broken_comment() {
        let source = "<!-- one\ntwo -->\nafter";
        let mut text = highlighted(source);
        // Deleting the opener ends the comment on every line it covered.
        text.delete(0..4);
        chain(true).apply(&mut text, 0..0);
        let source = text.to_string();
        assert!(!construct_in_range(&text, find(&source, "two"), Construct::Comment));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let source = "== Head ==\n* '''a''' {{t}} [[l]] <!-- c -->\n";
        let once = highlighted(source);
        let mut twice = once.clone();
        chain(true).apply(&mut twice, 0..source.chars().count());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_highlighting_toggle_keeps_flags() {
        let source = "'''bold''' [[link]] {{template}}";
        let styled = highlighted(source);
        let mut plain = StyledText::from_str(source);
        chain(false).apply(&mut plain, 0..source.chars().count());

        for construct in Construct::ALL {
            for pos in 0..source.chars().count() {
                assert_eq!(
                    construct_in_range(&styled, pos..pos + 1, construct),
                    construct_in_range(&plain, pos..pos + 1, construct),
                    "{construct:?} at {pos}"
                );
            }
        }
        let base = Palette::default().colors.base_foreground;
        assert!(plain.runs().iter().all(|run| run.attributes.foreground == base));
    }
}
