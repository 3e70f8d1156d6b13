//! Wikitext constructs recognised by the formatters.
//!
//! Each construct has a detection scope: inline constructs (`'''bold'''`,
//! `[[link]]`) are detected by looking at the selected characters, line
//! constructs (`== heading ==`, `* list`) by looking at the selection's line.

/// Classification of a construct's detection scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructScope {
    /// Detected by overlap with the selected characters.
    Inline,
    /// Detected on the line containing the selection start.
    Line,
}

/// A recognisable wikitext markup pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    Bold,
    Italics,
    HorizontalTemplate,
    HorizontalReference,
    BulletSingleList,
    BulletMultipleList,
    NumberSingleList,
    NumberMultipleList,
    Heading,
    Subheading1,
    Subheading2,
    Subheading3,
    Subheading4,
    Strikethrough,
    Underline,
    Subscript,
    Superscript,
    SimpleLink,
    LinkWithNestedLink,
    Comment,
}

impl Construct {
    /// Every construct, in selection-state field order.
    pub const ALL: [Construct; 20] = [
        Construct::Bold,
        Construct::Italics,
        Construct::HorizontalTemplate,
        Construct::HorizontalReference,
        Construct::BulletSingleList,
        Construct::BulletMultipleList,
        Construct::NumberSingleList,
        Construct::NumberMultipleList,
        Construct::Heading,
        Construct::Subheading1,
        Construct::Subheading2,
        Construct::Subheading3,
        Construct::Subheading4,
        Construct::Strikethrough,
        Construct::Underline,
        Construct::Subscript,
        Construct::Superscript,
        Construct::SimpleLink,
        Construct::LinkWithNestedLink,
        Construct::Comment,
    ];

    pub fn scope(self) -> ConstructScope {
        match self {
            Construct::BulletSingleList
            | Construct::BulletMultipleList
            | Construct::NumberSingleList
            | Construct::NumberMultipleList
            | Construct::Heading
            | Construct::Subheading1
            | Construct::Subheading2
            | Construct::Subheading3
            | Construct::Subheading4 => ConstructScope::Line,
            _ => ConstructScope::Inline,
        }
    }

    /// Bit used for this construct in a [`ConstructSet`](crate::style::ConstructSet).
    pub(crate) fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Heading construct for a run of `level` equals signs (`==` is 2).
    ///
    /// Level 1 (`=Title=`) is reserved for the page title and is not a construct.
    pub fn heading_for_level(level: usize) -> Option<Construct> {
        match level {
            2 => Some(Construct::Heading),
            3 => Some(Construct::Subheading1),
            4 => Some(Construct::Subheading2),
            5 => Some(Construct::Subheading3),
            6 => Some(Construct::Subheading4),
            _ => None,
        }
    }

    /// List construct for a line-leading marker run such as `*`, `**` or `#`.
    pub fn list_for_marker(marker: &str) -> Option<Construct> {
        let mut chars = marker.chars();
        let first = chars.next()?;
        if !chars.all(|c| c == first) {
            return None;
        }
        let multiple = marker.chars().count() > 1;
        match (first, multiple) {
            ('*', false) => Some(Construct::BulletSingleList),
            ('*', true) => Some(Construct::BulletMultipleList),
            ('#', false) => Some(Construct::NumberSingleList),
            ('#', true) => Some(Construct::NumberMultipleList),
            _ => None,
        }
    }
}
