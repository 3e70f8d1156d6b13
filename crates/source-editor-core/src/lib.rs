//! source-editor-core: wikitext source editor logic without UI dependencies.
//!
//! This crate provides:
//! - `TextBuffer` trait and the ropey-backed `EditorRope`
//! - `StyledText` - text with per-range presentation attributes
//! - `FormatterChain` - ordered wikitext formatters that style and detect constructs
//! - `TextStorage` - flat and paragraph-incremental storage backends
//! - `SelectionState` - which constructs a selection sits in
//! - `MatchSession` - find and replace
//! - `SourceEditorMediator` - the entry point the host UI drives

pub mod debounce;
pub mod error;
pub mod find;
pub mod formatter;
pub mod mediator;
pub mod palette;
pub mod paragraph;
pub mod selection;
pub mod storage;
pub mod style;
pub mod styled;
pub mod syntax;
pub mod text;
pub mod text_helpers;
pub mod types;

pub use debounce::{LAYOUT_DEBOUNCE, LayoutDebouncer};
pub use error::{EditorError, PaletteError};
pub use find::MatchSession;
pub use formatter::{Formatter, FormatterChain, construct_in_range};
pub use mediator::{EditorCallbacks, EditorConfig, SourceEditorMediator};
pub use palette::{Colors, Fonts, Palette};
pub use paragraph::{Paragraph, ParagraphLayout, make_paragraph_id};
pub use selection::SelectionState;
pub use smol_str::SmolStr;
pub use storage::{
    Capabilities, FlatStorage, IncrementalStorage, SelectionData, StorageKind, TextStorage,
};
pub use style::{Attributes, Color, ConstructSet, Font, MatchHighlight, TextAlignment};
pub use styled::{AttributeRun, StyledText};
pub use syntax::{Construct, ConstructScope};
pub use text::{EditorRope, TextBuffer};
pub use types::Selection;
