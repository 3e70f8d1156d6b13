//! The source editor mediator.
//!
//! Owns the storage backend, the formatter chain and the find session, and is
//! the only thing the host UI talks to. Every public operation is best-effort:
//! a lookup that cannot run is logged at debug level and degrades to a neutral
//! result (all-false selection state, no-op find, zero replacements).

use std::ops::Range;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::debounce::LayoutDebouncer;
use crate::error::EditorError;
use crate::find::MatchSession;
use crate::formatter::FormatterChain;
use crate::palette::Palette;
use crate::selection::SelectionState;
use crate::storage::{Capabilities, StorageKind, TextStorage, new_storage};
use crate::style::TextAlignment;
use crate::styled::StyledText;
use crate::types::Selection;


/// Construction-time editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub text: String,
    pub syntax_highlighting_enabled: bool,
    pub text_alignment: TextAlignment,
    pub read_only: bool,
    pub initial_selection: Option<Range<usize>>,
    pub capabilities: Capabilities,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            syntax_highlighting_enabled: true,
            text_alignment: TextAlignment::Natural,
            read_only: false,
            initial_selection: None,
            capabilities: Capabilities::default(),
        }
    }
}

impl EditorConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

type ScrollCallback = Box<dyn FnMut(Option<Range<usize>>)>;
type LayoutCallback = Box<dyn FnMut(Range<usize>)>;

/// Notifications from the mediator to the host screen.
#[derive(Default)]
pub struct EditorCallbacks {
    scroll_to_match: Option<ScrollCallback>,
    ensure_layout: Option<LayoutCallback>,
}

impl EditorCallbacks {
    /// Called after every find/replace step with the current match, if any.
    pub fn on_scroll_to_match(mut self, f: impl FnMut(Option<Range<usize>>) + 'static) -> Self {
        self.scroll_to_match = Some(Box::new(f));
        self
    }

    /// Called with the character range to lay out when a debounced layout fires.
    pub fn on_ensure_layout(mut self, f: impl FnMut(Range<usize>) + 'static) -> Self {
        self.ensure_layout = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for EditorCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorCallbacks")
            .field("scroll_to_match", &self.scroll_to_match.is_some())
            .field("ensure_layout", &self.ensure_layout.is_some())
            .finish()
    }
}

pub struct SourceEditorMediator {
    storage: Box<dyn TextStorage>,
    chain: Rc<FormatterChain>,
    palette: Palette,
    syntax_highlighting_enabled: bool,
    text_alignment: TextAlignment,
    read_only: bool,
    selection: Selection,
    session: Option<MatchSession>,
    debouncer: LayoutDebouncer,
    callbacks: EditorCallbacks,
}

impl SourceEditorMediator {
    pub fn new(config: EditorConfig, palette: Palette, callbacks: EditorCallbacks) -> Self {
        let chain = Rc::new(FormatterChain::new(
            &palette,
            config.syntax_highlighting_enabled,
            config.text_alignment,
            1,
        ));
        let storage = new_storage(config.capabilities, &config.text, Rc::clone(&chain));
        let len = storage.len_chars();
        let selection = config
            .initial_selection
            .map(Selection::from)
            .unwrap_or_default()
            .clamped(len);

        tracing::debug!(
            target: "source_editor::mediator",
            kind = ?storage.kind(),
            len,
            read_only = config.read_only,
            "source editor created"
        );

        Self {
            storage,
            chain,
            palette,
            syntax_highlighting_enabled: config.syntax_highlighting_enabled,
            text_alignment: config.text_alignment,
            read_only: config.read_only,
            selection,
            session: None,
            debouncer: LayoutDebouncer::default(),
            callbacks,
        }
    }

    // === Accessors ===

    pub fn storage_kind(&self) -> StorageKind {
        self.storage.kind()
    }

    pub fn storage(&self) -> &dyn TextStorage {
        self.storage.as_ref()
    }

    /// The full styled document, or `None` while no view is attached.
    pub fn full_document(&self) -> Option<&StyledText> {
        self.storage.full_document()
    }

    /// Styled text covering `offset`: the whole document for the flat backend,
    /// the enclosing paragraph for the incremental one.
    pub fn styled_text_for(&mut self, offset: usize) -> Option<&StyledText> {
        match self.storage.selection_data(offset..offset) {
            Ok(data) => Some(data.text),
            Err(err) => {
                log_degraded("styled_text_for", &err);
                None
            }
        }
    }

    pub fn content_string(&self) -> String {
        self.storage.content_string()
    }

    pub fn chain(&self) -> &FormatterChain {
        &self.chain
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, range: Range<usize>) {
        self.selection = Selection::from(range).clamped(self.storage.len_chars());
    }

    // === Palette ===

    pub fn syntax_highlighting_enabled(&self) -> bool {
        self.syntax_highlighting_enabled
    }

    pub fn set_syntax_highlighting_enabled(&mut self, enabled: bool) {
        if self.syntax_highlighting_enabled == enabled {
            return;
        }
        self.syntax_highlighting_enabled = enabled;
        self.update_colors_and_fonts();
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.update_colors_and_fonts();
    }

    /// Rebuild the formatter chain from the current palette and restyle.
    ///
    /// The new chain replaces the old one whole; nothing ever sees a mix.
    pub fn update_colors_and_fonts(&mut self) {
        let generation = self.chain.generation() + 1;
        self.chain = Rc::new(FormatterChain::new(
            &self.palette,
            self.syntax_highlighting_enabled,
            self.text_alignment,
            generation,
        ));
        self.storage.set_chain(Rc::clone(&self.chain));

        if self.storage.kind() == StorageKind::Flat {
            self.debouncer.request(Instant::now());
        }
        tracing::debug!(
            target: "source_editor::mediator",
            generation,
            syntax_highlighting_enabled = self.syntax_highlighting_enabled,
            "colors and fonts updated"
        );
    }

    /// Run the debounced layout pass if it is due. Returns whether it ran.
    pub fn poll_layout(&mut self, now: Instant) -> bool {
        if !self.debouncer.poll(now) {
            return false;
        }
        let len = self.storage.len_chars();
        if let Some(ensure_layout) = self.callbacks.ensure_layout.as_mut() {
            ensure_layout(0..len);
        }
        true
    }

    pub fn layout_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    // === View attachment ===

    pub fn attach_view(&mut self) {
        self.storage.attach_view();
    }

    pub fn detach_view(&mut self) {
        self.storage.detach_view();
        self.debouncer.cancel();
    }

    // === Editing ===

    /// Apply a user edit and move the caret to the end of the inserted text.
    ///
    /// An active find session is ended first; its match offsets would not
    /// survive the edit.
    pub fn replace_characters(&mut self, range: Range<usize>, text: &str) {
        if self.read_only {
            log_degraded("replace_characters", &EditorError::ReadOnly);
            return;
        }
        if self.session.is_some() {
            self.find_reset();
        }
        let start = range.start;
        match self.storage.replace_characters(range, text) {
            Ok(()) => {
                let caret = start + text.chars().count();
                self.selection = Selection::collapsed(caret);
            }
            Err(err) => log_degraded("replace_characters", &err),
        }
    }

    // === Selection state ===

    /// Which constructs `range` sits in. All false when it cannot be resolved.
    pub fn selection_state(&mut self, range: Range<usize>) -> SelectionState {
        match self.storage.selection_data(range) {
            Ok(data) => SelectionState::resolve(&self.chain, &data),
            Err(err) => {
                log_degraded("selection_state", &err);
                SelectionState::default()
            }
        }
    }

    // === Find & replace ===

    pub fn has_match_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn match_count(&self) -> usize {
        self.session.as_ref().map_or(0, MatchSession::len)
    }

    pub fn current_match(&self) -> Option<Range<usize>> {
        self.session.as_ref().and_then(MatchSession::current_match)
    }

    /// Start a match session for `search_text` and select the first match at
    /// or after the current selection. Empty search text is ignored.
    pub fn find_start(&mut self, search_text: &str) {
        if search_text.is_empty() {
            log_degraded("find_start", &EditorError::EmptySearch);
            return;
        }

        let mut previous = self.session.take();
        let mut started = None;
        let result = self.storage.perform_editing_transaction(&mut |text| {
            if let Some(previous) = previous.as_mut() {
                previous.reset(text);
            }
            started = Some(MatchSession::start(text, search_text));
        });

        match (result, started) {
            (Ok(()), Some(Ok(session))) => self.session = Some(session),
            (Err(err), _) | (_, Some(Err(err))) => {
                self.session = previous;
                log_degraded("find_start", &err);
                return;
            }
            (Ok(()), None) => return,
        }

        self.find_next(Some(self.selection.to_range()));
    }

    /// Select the next match: the first one after `after` when given,
    /// otherwise the one after the current match.
    pub fn find_next(&mut self, after: Option<Range<usize>>) {
        let result = self.edit_session(|session, text| session.next(text, after));
        self.finish_navigation("find_next", result);
    }

    pub fn find_previous(&mut self) {
        let result = self.edit_session(|session, text| session.previous(text));
        self.finish_navigation("find_previous", result);
    }

    /// Replace the current match with `replace_text` and select the next one.
    pub fn replace_single(&mut self, replace_text: &str) {
        if self.read_only {
            log_degraded("replace_single", &EditorError::ReadOnly);
        } else {
            let result = self
                .edit_session(|session, text| session.replace_single(text, replace_text))
                .and_then(|replaced| replaced);
            match result {
                Ok(_) => self.select_current_match(),
                Err(err) => log_degraded("replace_single", &err),
            }
        }
        self.notify_scroll();
    }

    /// Replace every match with `replace_text`. Returns how many were replaced.
    pub fn replace_all(&mut self, replace_text: &str) -> usize {
        let count = if self.read_only {
            log_degraded("replace_all", &EditorError::ReadOnly);
            0
        } else {
            match self.edit_session(|session, text| session.replace_all(text, replace_text)) {
                Ok(count) => count,
                Err(err) => {
                    log_degraded("replace_all", &err);
                    0
                }
            }
        };
        self.notify_scroll();
        count
    }

    /// End the match session and clear its highlighting. Safe to call twice.
    pub fn find_reset(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        let result = self
            .storage
            .perform_editing_transaction(&mut |text| session.reset(text));
        if let Err(err) = result {
            log_degraded("find_reset", &err);
        }
    }

    /// Run `f` against the match session inside a storage transaction.
    fn edit_session<R>(
        &mut self,
        f: impl FnOnce(&mut MatchSession, &mut StyledText) -> R,
    ) -> Result<R, EditorError> {
        let session = self.session.as_mut().ok_or(EditorError::NoActiveMatch)?;
        let mut f = Some(f);
        let mut output = None;
        self.storage.perform_editing_transaction(&mut |text| {
            if let Some(f) = f.take() {
                output = Some(f(&mut *session, text));
            }
        })?;
        output.ok_or(EditorError::BackendUnavailable)
    }

    fn finish_navigation(&mut self, op: &str, result: Result<Option<Range<usize>>, EditorError>) {
        match result {
            Ok(Some(_)) => self.select_current_match(),
            Ok(None) => tracing::debug!(target: "source_editor::find", op, "no matches"),
            Err(err) => log_degraded(op, &err),
        }
        self.notify_scroll();
    }

    fn select_current_match(&mut self) {
        if let Some(current) = self.current_match() {
            self.selection = Selection::from(current);
        }
    }

    fn notify_scroll(&mut self) {
        let current = self.current_match();
        if let Some(scroll) = self.callbacks.scroll_to_match.as_mut() {
            scroll(current);
        }
    }
}

impl std::fmt::Debug for SourceEditorMediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceEditorMediator")
            .field("kind", &self.storage.kind())
            .field("chain", &self.chain)
            .field("syntax_highlighting_enabled", &self.syntax_highlighting_enabled)
            .field("read_only", &self.read_only)
            .field("selection", &self.selection)
            .field("session", &self.session)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

fn log_degraded(op: &str, err: &EditorError) {
    tracing::debug!(target: "source_editor::mediator", op, %err, "operation degraded");
}
