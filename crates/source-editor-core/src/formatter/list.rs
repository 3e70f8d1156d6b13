//! List formatter: `*` bullet and `#` numbered list lines.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::palette::Colors;
use crate::style::Color;
use crate::styled::StyledText;
use crate::syntax::Construct;

use super::{Formatter, Scan, mark, recolor};

static LIST_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\*+|#+)(.*)$").expect("valid list regex"));

pub struct ListFormatter {
    marker_color: Color,
}

impl ListFormatter {
    pub fn new(colors: &Colors) -> Self {
        Self {
            marker_color: colors.orange_foreground,
        }
    }
}

impl Formatter for ListFormatter {
    fn name(&self) -> &'static str {
        "list"
    }

    fn add_syntax_highlighting(&self, text: &mut StyledText, range: Range<usize>) {
        let scan = Scan::new(text, range);
        for caps in LIST_LINE.captures_iter(scan.source()) {
            let (Some(line), Some(marker)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(construct) = Construct::list_for_marker(marker.as_str()) else {
                continue;
            };
            mark(text, scan.chars(line.range()), construct, None);
            recolor(text, scan.chars(marker.range()), self.marker_color);
        }
    }

    fn constructs(&self) -> &'static [Construct] {
        &[
            Construct::BulletSingleList,
            Construct::BulletMultipleList,
            Construct::NumberSingleList,
            Construct::NumberMultipleList,
        ]
    }
}
