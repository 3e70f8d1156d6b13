//! Selection state: which constructs the current selection sits in.
//!
//! Drives toolbar button state. It is advisory, so a selection that cannot be
//! resolved yields the all-false state instead of an error.

use crate::formatter::FormatterChain;
use crate::storage::SelectionData;
use crate::syntax::Construct;

/// One flag per construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub is_bold: bool,
    pub is_italics: bool,
    pub is_horizontal_template: bool,
    pub is_horizontal_reference: bool,
    pub is_bullet_single_list: bool,
    pub is_bullet_multiple_list: bool,
    pub is_number_single_list: bool,
    pub is_number_multiple_list: bool,
    pub is_heading: bool,
    pub is_subheading1: bool,
    pub is_subheading2: bool,
    pub is_subheading3: bool,
    pub is_subheading4: bool,
    pub is_strikethrough: bool,
    pub is_underline: bool,
    pub is_subscript: bool,
    pub is_superscript: bool,
    pub is_simple_link: bool,
    pub is_link_with_nested_link: bool,
    pub is_comment: bool,
}

impl SelectionState {
    /// Ask every formatter in `chain` about the selection in `data`.
    pub fn resolve(chain: &FormatterChain, data: &SelectionData<'_>) -> Self {
        let mut state = Self::default();
        for construct in Construct::ALL {
            *state.flag_mut(construct) = chain.is_present(data.text, data.range.clone(), construct);
        }
        state
    }

    pub fn get(&self, construct: Construct) -> bool {
        let mut copy = *self;
        *copy.flag_mut(construct)
    }

    /// Constructs whose flag is set.
    pub fn active(&self) -> impl Iterator<Item = Construct> + '_ {
        Construct::ALL.into_iter().filter(|c| self.get(*c))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn flag_mut(&mut self, construct: Construct) -> &mut bool {
        match construct {
            Construct::Bold => &mut self.is_bold,
            Construct::Italics => &mut self.is_italics,
            Construct::HorizontalTemplate => &mut self.is_horizontal_template,
            Construct::HorizontalReference => &mut self.is_horizontal_reference,
            Construct::BulletSingleList => &mut self.is_bullet_single_list,
            Construct::BulletMultipleList => &mut self.is_bullet_multiple_list,
            Construct::NumberSingleList => &mut self.is_number_single_list,
            Construct::NumberMultipleList => &mut self.is_number_multiple_list,
            Construct::Heading => &mut self.is_heading,
            Construct::Subheading1 => &mut self.is_subheading1,
            Construct::Subheading2 => &mut self.is_subheading2,
            Construct::Subheading3 => &mut self.is_subheading3,
            Construct::Subheading4 => &mut self.is_subheading4,
            Construct::Strikethrough => &mut self.is_strikethrough,
            Construct::Underline => &mut self.is_underline,
            Construct::Subscript => &mut self.is_subscript,
            Construct::Superscript => &mut self.is_superscript,
            Construct::SimpleLink => &mut self.is_simple_link,
            Construct::LinkWithNestedLink => &mut self.is_link_with_nested_link,
            Construct::Comment => &mut self.is_comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::test_support::{chain, find, highlighted};

    fn state_for(source: &str, needle: &str) -> SelectionState {
        let text = highlighted(source);
        let data = SelectionData {
            text: &text,
            range: find(source, needle),
        };
        SelectionState::resolve(&chain(true), &data)
    }

    #[test]
    fn test_default_is_all_false() {
        let state = SelectionState::default();
        assert!(state.is_empty());
        assert_eq!(state.active().count(), 0);
    }

    #[test]
    fn test_field_mapping_round_trips() {
        for construct in Construct::ALL {
            let mut state = SelectionState::default();
            *state.flag_mut(construct) = true;
            assert_eq!(state.active().collect::<Vec<_>>(), vec![construct]);
        }
    }

    #[test]
    fn test_each_construct_alone() {
        let cases = [
            ("a '''word''' b", "word", Construct::Bold),
            ("a ''word'' b", "word", Construct::Italics),
            ("a {{word}} b", "word", Construct::HorizontalTemplate),
            ("a<ref>word</ref> b", "word", Construct::HorizontalReference),
            ("* word", "word", Construct::BulletSingleList),
            ("** word", "word", Construct::BulletMultipleList),
            ("# word", "word", Construct::NumberSingleList),
            ("## word", "word", Construct::NumberMultipleList),
            ("== word ==", "word", Construct::Heading),
            ("=== word ===", "word", Construct::Subheading1),
            ("==== word ====", "word", Construct::Subheading2),
            ("===== word =====", "word", Construct::Subheading3),
            ("====== word ======", "word", Construct::Subheading4),
            ("a <s>word</s> b", "word", Construct::Strikethrough),
            ("a <u>word</u> b", "word", Construct::Underline),
            ("a <sub>word</sub> b", "word", Construct::Subscript),
            ("a <sup>word</sup> b", "word", Construct::Superscript),
            ("a [[word]] b", "word", Construct::SimpleLink),
            ("a [[File:x|[[word]]]] b", "word", Construct::LinkWithNestedLink),
            ("a <!-- word --> b", "word", Construct::Comment),
        ];
        assert_eq!(cases.len(), Construct::ALL.len());

        for (source, needle, construct) in cases {
            let state = state_for(source, needle);
            assert_eq!(state.active().collect::<Vec<_>>(), vec![construct], "{source}");
        }
    }

    #[test]
    fn test_bold_italics_sets_both() {
        let state = state_for("'''''both'''''", "both");
        assert!(state.is_bold);
        assert!(state.is_italics);
        assert_eq!(state.active().count(), 2);
    }

    #[test]
    fn test_plain_text_is_empty() {
        assert!(state_for("just words", "words").is_empty());
    }
}
