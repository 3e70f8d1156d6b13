use std::ops::Range;
use std::rc::Rc;

use crate::error::EditorError;
use crate::formatter::FormatterChain;
use crate::paragraph::{ParagraphLayout, RenderedParagraph};
use crate::styled::StyledText;

use super::{SelectionData, StorageKind, TextStorage, check_range};

/// Paragraph-granularity storage.
///
/// The backing store holds the text and find markers only. Styling happens per
/// paragraph, on demand: a paragraph is copied out of the backing store, run
/// through the chain, and cached until its text, its markers or the chain
/// generation changes. The layout only exists while a view is attached.
#[derive(Debug)]
pub struct IncrementalStorage {
    backing: StyledText,
    layout: Option<ParagraphLayout>,
    chain: Rc<FormatterChain>,
}

impl IncrementalStorage {
    pub fn new(text: &str, chain: Rc<FormatterChain>) -> Self {
        let backing = StyledText::from_str(text);
        let layout = Some(ParagraphLayout::build(&backing));
        Self {
            backing,
            layout,
            chain,
        }
    }

    pub fn layout(&self) -> Option<&ParagraphLayout> {
        self.layout.as_ref()
    }

    /// Styled text of paragraph `idx`, materializing it if needed.
    pub fn paragraph(&mut self, idx: usize) -> Result<&StyledText, EditorError> {
        let layout = self.layout.as_mut().ok_or(EditorError::BackendUnavailable)?;
        let len = self.backing.len_chars();
        let para = layout.get_mut(idx).ok_or(EditorError::RangeUnresolvable {
            range: idx..idx,
            len,
        })?;

        let generation = self.chain.generation();
        if para.rendered_for(generation).is_none() {
            let mut text = self.backing.substring(para.char_range.clone());
            let para_len = text.len_chars();
            self.chain.apply(&mut text, 0..para_len);
            tracing::trace!(
                target: "source_editor::storage",
                id = %para.id,
                generation,
                "paragraph materialized"
            );
            para.rendered = Some(RenderedParagraph { text, generation });
        }

        para.rendered
            .as_ref()
            .map(|rendered| &rendered.text)
            .ok_or(EditorError::BackendUnavailable)
    }

    /// Recompute paragraphs after the backing store changed.
    fn commit(&mut self) {
        self.backing.take_dirty();
        if let Some(layout) = self.layout.as_mut() {
            let reused = layout.relayout(&self.backing);
            tracing::debug!(
                target: "source_editor::storage",
                paragraphs = layout.paragraphs().len(),
                reused,
                "incremental layout committed"
            );
        }
    }
}

impl TextStorage for IncrementalStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Incremental
    }

    fn full_document(&self) -> Option<&StyledText> {
        self.layout.as_ref().map(|_| &self.backing)
    }

    fn content_string(&self) -> String {
        self.backing.to_string()
    }

    fn len_chars(&self) -> usize {
        self.backing.len_chars()
    }

    fn is_attached(&self) -> bool {
        self.layout.is_some()
    }

    fn attach_view(&mut self) {
        if self.layout.is_none() {
            self.layout = Some(ParagraphLayout::build(&self.backing));
        }
    }

    fn detach_view(&mut self) {
        self.layout = None;
    }

    fn replace_characters(&mut self, range: Range<usize>, text: &str) -> Result<(), EditorError> {
        if self.layout.is_none() {
            return Err(EditorError::BackendUnavailable);
        }
        check_range(&range, self.backing.len_chars())?;
        self.backing.replace(range, text);
        self.commit();
        Ok(())
    }

    fn perform_editing_transaction(
        &mut self,
        body: &mut dyn FnMut(&mut StyledText),
    ) -> Result<(), EditorError> {
        if self.layout.is_none() {
            return Err(EditorError::BackendUnavailable);
        }
        body(&mut self.backing);
        self.commit();
        Ok(())
    }

    fn chain(&self) -> &FormatterChain {
        &self.chain
    }

    fn set_chain(&mut self, chain: Rc<FormatterChain>) {
        // Cached paragraphs carry the old generation and restyle on next use.
        self.chain = chain;
    }

    fn selection_data(&mut self, range: Range<usize>) -> Result<SelectionData<'_>, EditorError> {
        let layout = self.layout.as_ref().ok_or(EditorError::BackendUnavailable)?;
        let len = self.backing.len_chars();
        check_range(&range, len)?;

        let unresolvable = || EditorError::RangeUnresolvable {
            range: range.clone(),
            len,
        };
        let idx = layout.index_at(range.start).ok_or_else(unresolvable)?;
        let para_range = layout
            .paragraphs()
            .get(idx)
            .map(|p| p.char_range.clone())
            .ok_or_else(unresolvable)?;

        let local = range.start - para_range.start..range.end.min(para_range.end) - para_range.start;
        let text = self.paragraph(idx)?;
        Ok(SelectionData { text, range: local })
    }
}
