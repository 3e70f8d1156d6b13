//! Restyles characters marked by an active find session.
//!
//! Runs last in the chain so match colors sit on top of syntax colors.

use std::ops::Range;

use crate::palette::Colors;
use crate::style::{Color, MatchHighlight};
use crate::styled::StyledText;

use super::Formatter;

pub struct FindAndReplaceFormatter {
    foreground: Color,
    match_background: Color,
    selected_background: Color,
    replaced_background: Color,
}

impl FindAndReplaceFormatter {
    pub fn new(colors: &Colors) -> Self {
        Self {
            foreground: colors.match_foreground,
            match_background: colors.match_background,
            selected_background: colors.selected_match_background,
            replaced_background: colors.replaced_match_background,
        }
    }

    fn background(&self, highlight: MatchHighlight) -> Color {
        match highlight {
            MatchHighlight::Match => self.match_background,
            MatchHighlight::Selected => self.selected_background,
            MatchHighlight::Replaced => self.replaced_background,
        }
    }
}

impl Formatter for FindAndReplaceFormatter {
    fn name(&self) -> &'static str {
        "find_and_replace"
    }

    fn add_syntax_highlighting(&self, text: &mut StyledText, range: Range<usize>) {
        let marked: Vec<(Range<usize>, MatchHighlight)> = text
            .runs_in(range)
            .filter_map(|(run, attrs)| attrs.find_match.map(|h| (run, h)))
            .collect();
        for (run, highlight) in marked {
            let background = self.background(highlight);
            text.update_attributes(run, |attrs| {
                attrs.foreground = self.foreground;
                attrs.background = Some(background);
            });
        }
    }
}
