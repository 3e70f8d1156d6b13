//! Text storage backends.
//!
//! Two representations of the styled document sit behind one trait:
//! - `FlatStorage`: the whole document as one styled text, highlighted eagerly
//! - `IncrementalStorage`: a plain backing store plus a paragraph layout,
//!   with each paragraph styled lazily when something asks for it
//!
//! The backend is chosen once from `Capabilities`; callers only ever see
//! `dyn TextStorage`.

use std::ops::Range;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::formatter::FormatterChain;
use crate::styled::StyledText;

mod flat;
mod incremental;

pub use flat::FlatStorage;
pub use incremental::IncrementalStorage;

/// Which storage representation is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Flat,
    Incremental,
}

impl StorageKind {
    pub fn for_capabilities(capabilities: Capabilities) -> Self {
        if capabilities.incremental_layout {
            StorageKind::Incremental
        } else {
            StorageKind::Flat
        }
    }
}

/// What the host platform's text system supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// Paragraph-granularity layout is available.
    pub incremental_layout: bool,
}

/// The styled text a selection query should run against, and the selection
/// translated into that text's coordinates.
#[derive(Debug, Clone)]
pub struct SelectionData<'a> {
    pub text: &'a StyledText,
    pub range: Range<usize>,
}

/// Backend adapter over a styled document.
///
/// Every operation that needs the view reports `EditorError::BackendUnavailable`
/// while detached.
pub trait TextStorage {
    // === Required: Identity ===

    fn kind(&self) -> StorageKind;

    // === Required: Document access ===

    /// The whole styled document, or `None` while detached.
    fn full_document(&self) -> Option<&StyledText>;

    /// Plain document text. Available whether or not a view is attached.
    fn content_string(&self) -> String;

    fn len_chars(&self) -> usize;

    // === Required: View attachment ===

    fn is_attached(&self) -> bool;

    fn attach_view(&mut self);

    fn detach_view(&mut self);

    // === Required: Editing ===

    /// A user edit: replace `range` with `text` and re-highlight what it touched.
    fn replace_characters(&mut self, range: Range<usize>, text: &str) -> Result<(), EditorError>;

    /// Run `body` with exclusive access to the document.
    ///
    /// Highlighting and layout are deferred until `body` returns, then run once
    /// over everything `body` touched.
    fn perform_editing_transaction(
        &mut self,
        body: &mut dyn FnMut(&mut StyledText),
    ) -> Result<(), EditorError>;

    // === Required: Highlighting ===

    fn chain(&self) -> &FormatterChain;

    /// Swap in a rebuilt formatter chain and restyle with it.
    fn set_chain(&mut self, chain: Rc<FormatterChain>);

    /// Styled text and local range to evaluate a selection against.
    fn selection_data(&mut self, range: Range<usize>) -> Result<SelectionData<'_>, EditorError>;

    // === Provided ===

    /// `full_document`, with detachment as an error.
    fn document(&self) -> Result<&StyledText, EditorError> {
        self.full_document().ok_or(EditorError::BackendUnavailable)
    }
}

/// Build the storage for the given capabilities.
pub fn new_storage(
    capabilities: Capabilities,
    text: &str,
    chain: Rc<FormatterChain>,
) -> Box<dyn TextStorage> {
    match StorageKind::for_capabilities(capabilities) {
        StorageKind::Flat => Box::new(FlatStorage::new(text, chain)),
        StorageKind::Incremental => Box::new(IncrementalStorage::new(text, chain)),
    }
}

/// Reject ranges that are inverted or run past the end of the document.
pub(crate) fn check_range(range: &Range<usize>, len: usize) -> Result<(), EditorError> {
    if range.start > range.end || range.end > len {
        return Err(EditorError::RangeUnresolvable {
            range: range.clone(),
            len,
        });
    }
    Ok(())
}
