use std::ops::Range;
use std::rc::Rc;

use crate::error::EditorError;
use crate::formatter::FormatterChain;
use crate::styled::StyledText;

use super::{SelectionData, StorageKind, TextStorage, check_range};

/// Whole-document storage.
///
/// The document is fully styled at all times. Each user edit re-highlights the
/// lines it touched, plus any comment spanning them, unless highlight
/// processing is paused by a transaction.
#[derive(Debug)]
pub struct FlatStorage {
    text: StyledText,
    chain: Rc<FormatterChain>,
    highlight_processing_enabled: bool,
    attached: bool,
}

impl FlatStorage {
    pub fn new(text: &str, chain: Rc<FormatterChain>) -> Self {
        let mut text = StyledText::from_str(text);
        let len = text.len_chars();
        chain.apply(&mut text, 0..len);
        Self {
            text,
            chain,
            highlight_processing_enabled: true,
            attached: true,
        }
    }

    pub fn highlight_processing_enabled(&self) -> bool {
        self.highlight_processing_enabled
    }

    /// Re-highlight whatever was edited since the last pass.
    fn process_edits(&mut self) {
        if !self.highlight_processing_enabled {
            return;
        }
        if let Some(dirty) = self.text.take_dirty() {
            self.chain.apply(&mut self.text, dirty);
        }
    }
}

impl TextStorage for FlatStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Flat
    }

    fn full_document(&self) -> Option<&StyledText> {
        self.attached.then_some(&self.text)
    }

    fn content_string(&self) -> String {
        self.text.to_string()
    }

    fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn attach_view(&mut self) {
        self.attached = true;
    }

    fn detach_view(&mut self) {
        self.attached = false;
    }

    fn replace_characters(&mut self, range: Range<usize>, text: &str) -> Result<(), EditorError> {
        if !self.attached {
            return Err(EditorError::BackendUnavailable);
        }
        check_range(&range, self.text.len_chars())?;
        self.text.replace(range, text);
        self.process_edits();
        Ok(())
    }

    fn perform_editing_transaction(
        &mut self,
        body: &mut dyn FnMut(&mut StyledText),
    ) -> Result<(), EditorError> {
        if !self.attached {
            return Err(EditorError::BackendUnavailable);
        }
        self.highlight_processing_enabled = false;
        body(&mut self.text);
        self.highlight_processing_enabled = true;

        if tracing::enabled!(target: "source_editor::storage", tracing::Level::TRACE) {
            tracing::trace!(
                target: "source_editor::storage",
                dirty = ?self.text.dirty(),
                "flat transaction committed"
            );
        }
        self.process_edits();
        Ok(())
    }

    fn chain(&self) -> &FormatterChain {
        &self.chain
    }

    fn set_chain(&mut self, chain: Rc<FormatterChain>) {
        self.chain = chain;
        let len = self.text.len_chars();
        self.chain.apply(&mut self.text, 0..len);
        // A full pass covers anything pending.
        self.text.take_dirty();
    }

    fn selection_data(&mut self, range: Range<usize>) -> Result<SelectionData<'_>, EditorError> {
        let text = self.full_document().ok_or(EditorError::BackendUnavailable)?;
        check_range(&range, text.len_chars())?;
        Ok(SelectionData { text, range })
    }
}
