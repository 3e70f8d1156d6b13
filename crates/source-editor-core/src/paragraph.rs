//! Paragraph layout for the incremental storage.
//!
//! A paragraph is a run of text up to and including a `\n`. Paragraphs are
//! styled lazily and cached by content hash, so a relayout after an edit only
//! re-styles the paragraphs whose text or find markers changed.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use smol_str::{SmolStr, format_smolstr};

use crate::styled::StyledText;
use crate::text::TextBuffer;

/// A laid-out paragraph and its cached styled copy.
#[derive(Debug, Clone)]
pub struct Paragraph {
    /// Stable ID, kept while the paragraph's content is unchanged (format: `p-{index}`)
    pub id: SmolStr,
    /// Source char range in the document, including the trailing newline.
    pub char_range: Range<usize>,
    /// Hash of the paragraph text and find markers.
    pub source_hash: u64,
    /// Styled copy, present once materialized.
    pub rendered: Option<RenderedParagraph>,
}

/// A paragraph styled by a specific formatter chain.
#[derive(Debug, Clone)]
pub struct RenderedParagraph {
    pub text: StyledText,
    /// Generation of the chain that produced `text`.
    pub generation: u64,
}

impl Paragraph {
    /// Cached styled text, if it was produced by chain `generation`.
    pub fn rendered_for(&self, generation: u64) -> Option<&StyledText> {
        self.rendered
            .as_ref()
            .filter(|r| r.generation == generation)
            .map(|r| &r.text)
    }
}

/// Hash of a paragraph's text plus the find markers inside it.
///
/// Markers are part of the hash because a materialized paragraph copies them
/// from the backing store.
pub fn hash_paragraph(text: &StyledText, range: Range<usize>) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.slice(range.clone()).unwrap_or_default().hash(&mut hasher);
    for (run, attrs) in text.runs_in(range.clone()) {
        if let Some(highlight) = attrs.find_match {
            (run.start - range.start, run.end - range.start).hash(&mut hasher);
            (highlight as u8).hash(&mut hasher);
        }
    }
    hasher.finish()
}

/// Generate a paragraph ID from monotonic counter.
pub fn make_paragraph_id(index: usize) -> SmolStr {
    format_smolstr!("p-{}", index)
}

/// Split a document into paragraph ranges, each ending after its `\n`.
///
/// An empty document has no paragraphs; a trailing newline does not start an
/// empty final paragraph.
pub fn paragraph_ranges<T: TextBuffer + ?Sized>(text: &T) -> Vec<Range<usize>> {
    let len = text.len_chars();
    let mut ranges = Vec::new();
    let mut start = 0;
    while start < len {
        let line = text.line_range(start);
        let end = (line.end + 1).min(len);
        ranges.push(start..end);
        start = end;
    }
    ranges
}

/// Paragraph layout of a document.
#[derive(Debug, Clone, Default)]
pub struct ParagraphLayout {
    paragraphs: Vec<Paragraph>,
    next_para_id: usize,
}

impl ParagraphLayout {
    pub fn build(text: &StyledText) -> Self {
        let mut layout = Self::default();
        layout.relayout(text);
        layout
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Recompute paragraph boundaries, reusing paragraphs whose hash is unchanged.
    ///
    /// Returns the number of paragraphs that were reused.
    pub fn relayout(&mut self, text: &StyledText) -> usize {
        let mut cached: HashMap<u64, Vec<Paragraph>> = HashMap::new();
        for para in self.paragraphs.drain(..).rev() {
            cached.entry(para.source_hash).or_default().push(para);
        }

        let mut reused = 0;
        let mut paragraphs = Vec::new();
        for range in paragraph_ranges(text.text()) {
            let source_hash = hash_paragraph(text, range.clone());
            let para = match cached.get_mut(&source_hash).and_then(Vec::pop) {
                Some(mut para) => {
                    reused += 1;
                    para.char_range = range;
                    para
                }
                None => {
                    let id = make_paragraph_id(self.next_para_id);
                    self.next_para_id += 1;
                    Paragraph {
                        id,
                        char_range: range,
                        source_hash,
                        rendered: None,
                    }
                }
            };
            paragraphs.push(para);
        }
        self.paragraphs = paragraphs;

        tracing::trace!(
            target: "source_editor::storage",
            paragraphs = self.paragraphs.len(),
            reused,
            "paragraph relayout"
        );
        reused
    }

    /// Index of the paragraph containing `offset`.
    ///
    /// The end-of-document offset resolves to the last paragraph.
    pub fn index_at(&self, offset: usize) -> Option<usize> {
        let idx = self
            .paragraphs
            .partition_point(|p| p.char_range.end <= offset);
        if idx < self.paragraphs.len() {
            return Some(idx);
        }
        match self.paragraphs.last() {
            Some(last) if last.char_range.end == offset => Some(self.paragraphs.len() - 1),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Paragraph> {
        self.paragraphs.get_mut(idx)
    }
}
