//! Presentation attributes attached to runs of styled text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::PaletteError;
use crate::syntax::Construct;

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Result<Self, PaletteError> {
        let invalid = || PaletteError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if digits.len() == 8 { channel(6)? } else { 0xff },
        })
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = PaletteError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// A font descriptor. Rendering and metrics are the host's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: SmolStr,
    pub size: f32,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Font {
    pub fn new(family: &str, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("system", 17.0)
    }
}

/// Paragraph alignment applied by the base formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignment {
    #[default]
    Natural,
    Left,
    Right,
    Center,
    Justified,
}

/// Find-and-replace state of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchHighlight {
    /// Part of a match that is not the current one.
    Match,
    /// Part of the current match.
    Selected,
    /// Text inserted by a replacement.
    Replaced,
}

/// Set of constructs a character belongs to.
///
/// Written by formatters independently of fonts and colors, so detection keeps
/// working when syntax highlighting is turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ConstructSet(u32);

impl ConstructSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, construct: Construct) -> bool {
        self.0 & construct.bit() != 0
    }

    pub fn insert(&mut self, construct: Construct) {
        self.0 |= construct.bit();
    }

    pub fn remove(&mut self, construct: Construct) {
        self.0 &= !construct.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Construct> {
        Construct::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Construct> for ConstructSet {
    fn from_iter<I: IntoIterator<Item = Construct>>(iter: I) -> Self {
        let mut set = Self::empty();
        for construct in iter {
            set.insert(construct);
        }
        set
    }
}

/// The resolved presentation of one character.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    pub font: Font,
    pub foreground: Color,
    pub background: Option<Color>,
    pub alignment: TextAlignment,
    pub constructs: ConstructSet,
    pub find_match: Option<MatchHighlight>,
}
