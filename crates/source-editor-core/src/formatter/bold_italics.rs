//! Bold and italics: `'''bold'''`, `''italics''`, `'''''both'''''`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::palette::{Colors, Fonts};
use crate::style::{Color, Font};
use crate::styled::StyledText;
use crate::syntax::Construct;

use super::{Formatter, Scan, mark, recolor};

static BOLD_ITALICS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'''''(.+?)'''''").expect("valid bold italics regex"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'''(.+?)'''").expect("valid bold regex"));
static ITALICS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"''(.+?)''").expect("valid italics regex"));

const BOLD_AND_ITALICS: &[Construct] = &[Construct::Bold, Construct::Italics];

pub struct BoldItalicsFormatter {
    delimiter_color: Color,
    bold: Font,
    italics: Font,
    bold_italics: Font,
}

impl BoldItalicsFormatter {
    pub fn new(colors: &Colors, fonts: &Fonts) -> Self {
        Self {
            delimiter_color: colors.orange_foreground,
            bold: fonts.bold.clone(),
            italics: fonts.italics.clone(),
            bold_italics: fonts.bold_italics.clone(),
        }
    }
}

impl Formatter for BoldItalicsFormatter {
    fn name(&self) -> &'static str {
        "bold_italics"
    }

    fn add_syntax_highlighting(&self, text: &mut StyledText, range: Range<usize>) {
        let mut scan = Scan::new(text, range);

        // Longest delimiter first; each pass masks what it matched so `''`
        // never pairs up with half of a `'''`.
        let passes: [(&Regex, usize, &Font, &[Construct]); 3] = [
            (&*BOLD_ITALICS, 5, &self.bold_italics, BOLD_AND_ITALICS),
            (&*BOLD, 3, &self.bold, &BOLD_AND_ITALICS[..1]),
            (&*ITALICS, 2, &self.italics, &BOLD_AND_ITALICS[1..]),
        ];

        for (regex, delimiter_len, font, constructs) in passes {
            let matched: Vec<Range<usize>> =
                regex.find_iter(scan.source()).map(|m| m.range()).collect();
            for bytes in matched {
                let chars = scan.chars(bytes.clone());
                let content = chars.start + delimiter_len..chars.end - delimiter_len;

                for construct in constructs {
                    mark(text, chars.clone(), *construct, None);
                }
                text.update_attributes(content, |attrs| attrs.font = font.clone());
                recolor(text, chars.start..chars.start + delimiter_len, self.delimiter_color);
                recolor(text, chars.end - delimiter_len..chars.end, self.delimiter_color);

                scan.mask(bytes);
            }
        }
    }

    fn constructs(&self) -> &'static [Construct] {
        BOLD_AND_ITALICS
    }
}
