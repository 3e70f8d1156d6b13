//! Template formatter: single-line `{{...}}` transclusions.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::palette::Colors;
use crate::style::Color;
use crate::styled::StyledText;
use crate::syntax::Construct;

use super::{Formatter, Scan, mark};

// One level of nesting, e.g. `{{cite|date={{date}}}}`.
static HORIZONTAL_TEMPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{[^{}\n]*(?:\{\{[^{}\n]*\}\}[^{}\n]*)*\}\}").expect("valid template regex")
});

pub struct TemplateFormatter {
    color: Color,
}

impl TemplateFormatter {
    pub fn new(colors: &Colors) -> Self {
        Self {
            color: colors.purple_foreground,
        }
    }
}

impl Formatter for TemplateFormatter {
    fn name(&self) -> &'static str {
        "template"
    }

    fn add_syntax_highlighting(&self, text: &mut StyledText, range: Range<usize>) {
        let scan = Scan::new(text, range);
        for m in HORIZONTAL_TEMPLATE.find_iter(scan.source()) {
            mark(text, scan.chars(m.range()), Construct::HorizontalTemplate, Some(self.color));
        }
    }

    fn constructs(&self) -> &'static [Construct] {
        &[Construct::HorizontalTemplate]
    }
}

#[cfg(test)]
mod tests {
    use crate::formatter::construct_in_range;
    use crate::formatter::test_support::{find, highlighted};
    use crate::palette::Colors;
    use crate::syntax::Construct;

    #[test]
    fn test_template_with_nested_template() {
        let source = "see {{cite|date={{date}}}} here";
        let text = highlighted(source);
        let template = find(source, "{{cite|date={{date}}}}");

        for pos in template.clone() {
            assert!(construct_in_range(&text, pos..pos + 1, Construct::HorizontalTemplate));
        }
        assert!(!construct_in_range(&text, 0..3, Construct::HorizontalTemplate));
        assert_eq!(
            text.attributes_at(template.start).unwrap().foreground,
            Colors::default().purple_foreground
        );
    }

    #[test]
    fn test_multiline_template_is_not_horizontal() {
        let text = highlighted("{{infobox\n|name=x\n}}");
        assert!(!construct_in_range(&text, 3..3, Construct::HorizontalTemplate));
    }
}
