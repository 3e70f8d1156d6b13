//! HTML-style inline tags: `<s>`, `<sup>`, `<sub>` and `<u>`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::palette::Colors;
use crate::style::Color;
use crate::styled::StyledText;
use crate::syntax::Construct;

use super::{Formatter, Scan, mark, recolor};

static STRIKETHROUGH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<s>)[^\n]*?(</s>)").expect("valid tag regex"));
static SUPERSCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<sup>)[^\n]*?(</sup>)").expect("valid tag regex"));
static SUBSCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<sub>)[^\n]*?(</sub>)").expect("valid tag regex"));
static UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<u>)[^\n]*?(</u>)").expect("valid tag regex"));

/// Formatter for one paired tag. The tags are colored, the content keeps its style.
pub struct TagFormatter {
    name: &'static str,
    regex: &'static LazyLock<Regex>,
    constructs: &'static [Construct],
    tag_color: Color,
}

impl TagFormatter {
    pub fn strikethrough(colors: &Colors) -> Self {
        Self {
            name: "strikethrough",
            regex: &STRIKETHROUGH,
            constructs: &[Construct::Strikethrough],
            tag_color: colors.green_foreground,
        }
    }

    pub fn superscript(colors: &Colors) -> Self {
        Self {
            name: "superscript",
            regex: &SUPERSCRIPT,
            constructs: &[Construct::Superscript],
            tag_color: colors.green_foreground,
        }
    }

    pub fn subscript(colors: &Colors) -> Self {
        Self {
            name: "subscript",
            regex: &SUBSCRIPT,
            constructs: &[Construct::Subscript],
            tag_color: colors.green_foreground,
        }
    }

    pub fn underline(colors: &Colors) -> Self {
        Self {
            name: "underline",
            regex: &UNDERLINE,
            constructs: &[Construct::Underline],
            tag_color: colors.green_foreground,
        }
    }
}

impl Formatter for TagFormatter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn add_syntax_highlighting(&self, text: &mut StyledText, range: Range<usize>) {
        let scan = Scan::new(text, range);
        let regex: &Regex = self.regex;
        for caps in regex.captures_iter(scan.source()) {
            let (Some(whole), Some(open), Some(close)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            for construct in self.constructs {
                mark(text, scan.chars(whole.range()), *construct, None);
            }
            recolor(text, scan.chars(open.range()), self.tag_color);
            recolor(text, scan.chars(close.range()), self.tag_color);
        }
    }

    fn constructs(&self) -> &'static [Construct] {
        self.constructs
    }
}

#[cfg(test)]
mod tests {
    use crate::formatter::construct_in_range;
    use crate::formatter::test_support::{find, highlighted};
    use crate::palette::Colors;
    use crate::syntax::Construct;

    #[test]
    fn test_each_tag() {
        let source = "<s>a</s> <sup>b</sup> <sub>c</sub> <u>d</u>";
        let text = highlighted(source);

        for (label, construct) in [
            ("a", Construct::Strikethrough),
            ("b", Construct::Superscript),
            ("c", Construct::Subscript),
            ("d", Construct::Underline),
        ] {
            let pos = find(source, &format!(">{label}<")).start + 1;
            assert!(construct_in_range(&text, pos..pos + 1, construct), "{label}");
            for other in [
                Construct::Strikethrough,
                Construct::Superscript,
                Construct::Subscript,
                Construct::Underline,
            ] {
                if other != construct {
                    assert!(!construct_in_range(&text, pos..pos + 1, other), "{label} {other:?}");
                }
            }
        }
    }

    #[test]
    fn test_tags_colored_content_plain() {
        let source = "<u>under</u>";
        let text = highlighted(source);
        let colors = Colors::default();
        assert_eq!(text.attributes_at(0).unwrap().foreground, colors.green_foreground);
        assert_eq!(text.attributes_at(3).unwrap().foreground, colors.base_foreground);
        assert_eq!(text.attributes_at(9).unwrap().foreground, colors.green_foreground);
    }

    #[test]
    fn test_unclosed_tag_is_ignored() {
        let text = highlighted("<s>never closed");
        assert!(!construct_in_range(&text, 4..5, Construct::Strikethrough));
    }
}
