//! Base formatter: resets every character in the range to the base style.

use std::ops::Range;

use crate::palette::{Colors, Fonts};
use crate::style::{Color, ConstructSet, Font, TextAlignment};
use crate::styled::StyledText;

use super::Formatter;

/// Applies base font, color and alignment, and clears construct flags.
///
/// Find markers are left alone; they belong to the match session, not to
/// a formatting pass.
pub struct BaseFormatter {
    font: Font,
    color: Color,
    alignment: TextAlignment,
}

impl BaseFormatter {
    pub fn new(colors: &Colors, fonts: &Fonts, alignment: TextAlignment) -> Self {
        Self {
            font: fonts.base.clone(),
            color: colors.base_foreground,
            alignment,
        }
    }
}

impl Formatter for BaseFormatter {
    fn name(&self) -> &'static str {
        "base"
    }

    fn add_syntax_highlighting(&self, text: &mut StyledText, range: Range<usize>) {
        text.update_attributes(range, |attrs| {
            attrs.font = self.font.clone();
            attrs.foreground = self.color;
            attrs.background = None;
            attrs.alignment = self.alignment;
            attrs.constructs = ConstructSet::empty();
        });
    }
}
