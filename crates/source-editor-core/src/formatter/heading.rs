//! Heading formatter: `== Heading ==` through `====== Subheading 4 ======`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::palette::{Colors, Fonts};
use crate::style::{Color, Font};
use crate::styled::StyledText;
use crate::syntax::Construct;

use super::{Formatter, Scan, mark, recolor};

static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(=+)(.+?)(=+)[ \t]*$").expect("valid heading regex"));

pub struct HeadingFormatter {
    delimiter_color: Color,
    /// Fonts for levels 2 through 6.
    fonts: [Font; 5],
}

impl HeadingFormatter {
    pub fn new(colors: &Colors, fonts: &Fonts) -> Self {
        Self {
            delimiter_color: colors.orange_foreground,
            fonts: [
                fonts.heading.clone(),
                fonts.subheading1.clone(),
                fonts.subheading2.clone(),
                fonts.subheading3.clone(),
                fonts.subheading4.clone(),
            ],
        }
    }
}

impl Formatter for HeadingFormatter {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn add_syntax_highlighting(&self, text: &mut StyledText, range: Range<usize>) {
        let scan = Scan::new(text, range);
        for caps in HEADING_LINE.captures_iter(scan.source()) {
            let (Some(line), Some(open), Some(close)) = (caps.get(0), caps.get(1), caps.get(3))
            else {
                continue;
            };
            // Unbalanced delimiters are not a heading.
            let level = open.len();
            if close.len() != level {
                continue;
            }
            let Some(construct) = Construct::heading_for_level(level) else {
                continue;
            };

            let font = &self.fonts[level - 2];
            let line = scan.chars(line.range());
            mark(text, line.clone(), construct, None);
            text.update_attributes(line, |attrs| attrs.font = font.clone());
            recolor(text, scan.chars(open.range()), self.delimiter_color);
            recolor(text, scan.chars(close.range()), self.delimiter_color);
        }
    }

    fn constructs(&self) -> &'static [Construct] {
        &[
            Construct::Heading,
            Construct::Subheading1,
            Construct::Subheading2,
            Construct::Subheading3,
            Construct::Subheading4,
        ]
    }
}
