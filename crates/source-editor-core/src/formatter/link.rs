//! Link formatter: `[[target|label]]`, optionally holding one nested link.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::palette::Colors;
use crate::style::Color;
use crate::styled::StyledText;
use crate::syntax::Construct;

use super::{Formatter, Scan, mark};

// e.g. `[[File:a.png|thumb|See [[Foo]]]]`
static NESTED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[[^\[\]\n]*(?:\[\[[^\[\]\n]*\]\][^\[\]\n]*)+\]\]").expect("valid link regex")
});
static SIMPLE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[[^\[\]\n]*\]\]").expect("valid link regex"));

pub struct LinkFormatter {
    color: Color,
}

impl LinkFormatter {
    pub fn new(colors: &Colors) -> Self {
        Self {
            color: colors.blue_foreground,
        }
    }
}

impl Formatter for LinkFormatter {
    fn name(&self) -> &'static str {
        "link"
    }

    fn add_syntax_highlighting(&self, text: &mut StyledText, range: Range<usize>) {
        let mut scan = Scan::new(text, range);
        // Outer links first; their inner links must not also count as simple links.
        for (regex, construct) in [
            (&*NESTED_LINK, Construct::LinkWithNestedLink),
            (&*SIMPLE_LINK, Construct::SimpleLink),
        ] {
            let matched: Vec<Range<usize>> =
                regex.find_iter(scan.source()).map(|m| m.range()).collect();
            for bytes in matched {
                mark(text, scan.chars(bytes.clone()), construct, Some(self.color));
                scan.mask(bytes);
            }
        }
    }

    fn constructs(&self) -> &'static [Construct] {
        &[Construct::SimpleLink, Construct::LinkWithNestedLink]
    }
}
