//! Reference formatter: single-line `<ref>` citations.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::palette::Colors;
use crate::style::Color;
use crate::styled::StyledText;
use crate::syntax::Construct;

use super::{Formatter, Scan, mark};

static SELF_CLOSING_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<ref\s[^>\n]*/>").expect("valid reference regex"));
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<ref(?:\s[^>\n]*)?>[^\n]*?</ref>").expect("valid reference regex")
});

pub struct ReferenceFormatter {
    color: Color,
}

impl ReferenceFormatter {
    pub fn new(colors: &Colors) -> Self {
        Self {
            color: colors.green_foreground,
        }
    }
}

impl Formatter for ReferenceFormatter {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn add_syntax_highlighting(&self, text: &mut StyledText, range: Range<usize>) {
        let mut scan = Scan::new(text, range);
        // Self-closing refs first so `<ref name="a" />` never opens a paired match.
        for regex in [&*SELF_CLOSING_REFERENCE, &*REFERENCE] {
            let matched: Vec<Range<usize>> =
                regex.find_iter(scan.source()).map(|m| m.range()).collect();
            for bytes in matched {
                mark(text, scan.chars(bytes.clone()), Construct::HorizontalReference, Some(self.color));
                scan.mask(bytes);
            }
        }
    }

    fn constructs(&self) -> &'static [Construct] {
        &[Construct::HorizontalReference]
    }
}

#[cfg(test)]
mod tests {
    use crate::formatter::construct_in_range;
    use crate::formatter::test_support::{find, highlighted};
    use crate::syntax::Construct;

    #[test]
    fn test_paired_reference() {
        let source = "Fact.<ref>Smith 2001</ref> More.";
        let text = highlighted(source);
        let inner = find(source, "Smith");
        assert!(construct_in_range(&text, inner, Construct::HorizontalReference));
        assert!(!construct_in_range(&text, 0..4, Construct::HorizontalReference));
        let after = find(source, "More");
        assert!(!construct_in_range(&text, after, Construct::HorizontalReference));
    }

    #[test]
    fn test_named_and_self_closing_reference() {
        let source = r#"A<ref name="a">B</ref> C<ref name="a" /> D"#;
        let text = highlighted(source);
        let reuse = find(source, r#"<ref name="a" />"#);
        assert!(construct_in_range(&text, reuse.start + 2..reuse.start + 3, Construct::HorizontalReference));
        let between = find(source, " C");
        assert!(!construct_in_range(&text, between.start..between.start + 1, Construct::HorizontalReference));
    }
}
