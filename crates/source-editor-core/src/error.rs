//! Error types for the source editor.
//!
//! `EditorError` names why a lookup degraded. Public queries never return it;
//! they log it and fall back to a neutral value (all-false selection state,
//! no-op find). `PaletteError` is returned from palette configuration.

use std::ops::Range;

use miette::Diagnostic;

/// Reasons an editor lookup or mutation could not run.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum EditorError {
    /// The storage is not attached to a view/layout yet.
    #[error("text storage is not attached to a layout")]
    #[diagnostic(code(source_editor::backend_unavailable))]
    BackendUnavailable,

    /// The range has no enclosing paragraph or lies outside the document.
    #[error("range {}..{} cannot be resolved in a document of {len} chars", .range.start, .range.end)]
    #[diagnostic(code(source_editor::range_unresolvable))]
    RangeUnresolvable { range: Range<usize>, len: usize },

    /// Find was started with an empty search string.
    #[error("search text is empty")]
    #[diagnostic(code(source_editor::empty_search))]
    EmptySearch,

    /// A find/replace step needs a match session with a current match.
    #[error("no active match")]
    #[diagnostic(code(source_editor::no_active_match))]
    NoActiveMatch,

    /// The editor was created read-only.
    #[error("document is read-only")]
    #[diagnostic(code(source_editor::read_only))]
    ReadOnly,
}

/// Palette configuration errors.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum PaletteError {
    #[error("invalid color {0:?}, expected #RRGGBB or #RRGGBBAA")]
    #[diagnostic(code(source_editor::palette::color))]
    InvalidColor(String),

    #[error(transparent)]
    #[diagnostic(code(source_editor::palette::toml))]
    Toml(#[from] toml::de::Error),
}
