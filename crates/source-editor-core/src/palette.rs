//! Color and font palette supplied by the host's theme.
//!
//! A palette is plain data: the host builds one (or loads it from TOML) and
//! hands it to the mediator, which rebuilds the formatter chain from it.

use serde::{Deserialize, Serialize};

use crate::error::PaletteError;
use crate::style::{Color, Font};

/// Colors keyed by semantic role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colors {
    pub base_foreground: Color,
    pub orange_foreground: Color,
    pub purple_foreground: Color,
    pub green_foreground: Color,
    pub blue_foreground: Color,
    pub gray_foreground: Color,
    pub match_foreground: Color,
    pub match_background: Color,
    pub selected_match_background: Color,
    pub replaced_match_background: Color,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            base_foreground: Color::rgb(0x20, 0x21, 0x22),
            orange_foreground: Color::rgb(0xac, 0x66, 0x00),
            purple_foreground: Color::rgb(0x6b, 0x4b, 0xa1),
            green_foreground: Color::rgb(0x14, 0x86, 0x6d),
            blue_foreground: Color::rgb(0x33, 0x66, 0xcc),
            gray_foreground: Color::rgb(0x72, 0x77, 0x7d),
            match_foreground: Color::rgb(0x20, 0x21, 0x22),
            match_background: Color::rgb(0xfc, 0xe7, 0xa6),
            selected_match_background: Color::rgb(0xff, 0xcc, 0x33),
            replaced_match_background: Color::rgb(0xd5, 0xfd, 0xf4),
        }
    }
}

/// Fonts keyed by semantic role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fonts {
    pub base: Font,
    pub bold: Font,
    pub italics: Font,
    pub bold_italics: Font,
    pub heading: Font,
    pub subheading1: Font,
    pub subheading2: Font,
    pub subheading3: Font,
    pub subheading4: Font,
}

impl Fonts {
    /// Derive every role from a body font family and size.
    pub fn from_body(family: &str, size: f32) -> Self {
        let body = Font::new(family, size);
        Self {
            bold: body.clone().bold(),
            italics: body.clone().italic(),
            bold_italics: body.clone().bold().italic(),
            heading: Font::new(family, size * 1.6).bold(),
            subheading1: Font::new(family, size * 1.45).bold(),
            subheading2: Font::new(family, size * 1.3).bold(),
            subheading3: Font::new(family, size * 1.15).bold(),
            subheading4: Font::new(family, size).bold(),
            base: body,
        }
    }
}

impl Default for Fonts {
    fn default() -> Self {
        Self::from_body("system", 17.0)
    }
}

/// A full theme palette.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default)]
    pub colors: Colors,
    #[serde(default)]
    pub fonts: Fonts,
}

impl Palette {
    /// Parse a palette from TOML with `[colors]` and `[fonts.<role>]` tables.
    ///
    /// Missing tables fall back to the default palette.
    pub fn from_toml_str(source: &str) -> Result<Self, PaletteError> {
        Ok(toml::from_str(source)?)
    }

    /// Palette the formatters should see for the given highlighting toggle.
    ///
    /// With highlighting off every accent color collapses to the base color and
    /// every construct font to the base font. Find-and-replace colors are kept.
    pub fn resolve(&self, syntax_highlighting_enabled: bool) -> Palette {
        if syntax_highlighting_enabled {
            return self.clone();
        }

        let base_color = self.colors.base_foreground;
        let base_font = &self.fonts.base;
        Palette {
            colors: Colors {
                orange_foreground: base_color,
                purple_foreground: base_color,
                green_foreground: base_color,
                blue_foreground: base_color,
                gray_foreground: base_color,
                ..self.colors.clone()
            },
            fonts: Fonts {
                base: base_font.clone(),
                bold: base_font.clone(),
                italics: base_font.clone(),
                bold_italics: base_font.clone(),
                heading: base_font.clone(),
                subheading1: base_font.clone(),
                subheading2: base_font.clone(),
                subheading3: base_font.clone(),
                subheading4: base_font.clone(),
            },
        }
    }
}
