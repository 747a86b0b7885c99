//! Color palettes for the editor.

use super::mode::TokenKind;
use crate::error::{FormulaError, Result};
use ratatui::style::{Color, Modifier, Style};

/// A named palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color,
    pub text: Color,
    pub keyword: Color,
    pub builtin: Color,
    pub string: Color,
    pub number: Color,
    pub comment: Color,
    pub operator: Color,
    pub matching_bracket: Color,
    pub popup_border: Color,
    pub popup_selected: Color,
}

const DEFAULT: Theme = Theme {
    name: "default",
    background: Color::Reset,
    text: Color::Reset,
    keyword: Color::Magenta,
    builtin: Color::Blue,
    string: Color::Green,
    number: Color::Cyan,
    comment: Color::DarkGray,
    operator: Color::Reset,
    matching_bracket: Color::Green,
    popup_border: Color::Blue,
    popup_selected: Color::DarkGray,
};

const COBALT: Theme = Theme {
    name: "cobalt",
    background: Color::Rgb(0x00, 0x22, 0x40),
    text: Color::White,
    keyword: Color::Rgb(0xff, 0xee, 0x80),
    builtin: Color::Rgb(0xff, 0x9e, 0x59),
    string: Color::Rgb(0x3a, 0xd9, 0x00),
    number: Color::Rgb(0xff, 0x80, 0xe1),
    comment: Color::Rgb(0x00, 0x88, 0xff),
    operator: Color::Rgb(0x84, 0xd2, 0xff),
    matching_bracket: Color::Rgb(0xff, 0xff, 0xff),
    popup_border: Color::Rgb(0x00, 0x88, 0xff),
    popup_selected: Color::Rgb(0x00, 0x44, 0x80),
};

const BLACKBOARD: Theme = Theme {
    name: "blackboard",
    background: Color::Rgb(0x0c, 0x10, 0x21),
    text: Color::Rgb(0xf8, 0xf8, 0xf8),
    keyword: Color::Rgb(0xfb, 0xde, 0x2d),
    builtin: Color::Rgb(0x8d, 0xa6, 0xce),
    string: Color::Rgb(0x61, 0xce, 0x3c),
    number: Color::Rgb(0xd8, 0xfa, 0x3c),
    comment: Color::Rgb(0xae, 0xae, 0xae),
    operator: Color::Rgb(0xfb, 0xde, 0x2d),
    matching_bracket: Color::Rgb(0xff, 0xff, 0xff),
    popup_border: Color::Rgb(0x8d, 0xa6, 0xce),
    popup_selected: Color::Rgb(0x25, 0x3b, 0x76),
};

const THEMES: [Theme; 3] = [DEFAULT, COBALT, BLACKBOARD];

impl Theme {
    /// Looks a palette up by name.
    pub fn by_name(name: &str) -> Result<Self> {
        THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
            .copied()
            .ok_or_else(|| {
                FormulaError::construction(format!(
                    "Unknown theme '{}'. Expected one of: {}",
                    name,
                    Self::names().join(", ")
                ))
            })
    }

    pub fn names() -> Vec<&'static str> {
        THEMES.iter().map(|t| t.name).collect()
    }

    /// Base style for editor cells.
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Style for a token of `kind`.
    pub fn token_style(&self, kind: TokenKind) -> Style {
        let base = self.base();
        match kind {
            TokenKind::Keyword => base.fg(self.keyword).add_modifier(Modifier::BOLD),
            TokenKind::Builtin => base.fg(self.builtin),
            TokenKind::String => base.fg(self.string),
            TokenKind::Number => base.fg(self.number),
            TokenKind::Comment => base.fg(self.comment).add_modifier(Modifier::ITALIC),
            TokenKind::Operator => base.fg(self.operator),
            TokenKind::Identifier | TokenKind::QuotedIdentifier | TokenKind::Punctuation => base,
        }
    }

    /// Style applied on top of a bracket that has a match under the cursor.
    pub fn bracket_style(&self) -> Style {
        Style::default()
            .fg(self.matching_bracket)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }
}
