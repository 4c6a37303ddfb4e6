//! Named color themes

use serde::{Deserialize, Serialize};

use crate::rendering::paint::Rgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: Rgba,
    pub secondary: Rgba,
    pub accent: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    Morandi,
    Orange,
    Instagram,
    Green,
    Pink,
    Gray,
    Notebook,
}

impl ColorTheme {
    pub const ALL: [ColorTheme; 7] = [
        ColorTheme::Morandi,
        ColorTheme::Orange,
        ColorTheme::Instagram,
        ColorTheme::Green,
        ColorTheme::Pink,
        ColorTheme::Gray,
        ColorTheme::Notebook,
    ];

    /// Look up a theme by name; unknown names fall back to morandi.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(ColorTheme::Morandi)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorTheme::Morandi => "morandi",
            ColorTheme::Orange => "orange",
            ColorTheme::Instagram => "instagram",
            ColorTheme::Green => "green",
            ColorTheme::Pink => "pink",
            ColorTheme::Gray => "gray",
            ColorTheme::Notebook => "notebook",
        }
    }

    pub fn palette(&self) -> Palette {
        let p = |a: u32, b: u32, c: u32| Palette { primary: hex(a), secondary: hex(b), accent: hex(c) };
        match self {
            ColorTheme::Morandi => p(0x8B7355, 0xA89F91, 0xD4A574),
            ColorTheme::Orange => p(0xFF6B35, 0xFF8C42, 0xFFB347),
            ColorTheme::Instagram => p(0xE1306C, 0xF77737, 0xFFDC80),
            ColorTheme::Green => p(0x4CAF50, 0x8BC34A, 0xCDDC39),
            ColorTheme::Pink => p(0xFF69B4, 0xFFB6C1, 0xFFC0CB),
            ColorTheme::Gray => p(0x696969, 0x808080, 0xA9A9A9),
            ColorTheme::Notebook => p(0x2C3E50, 0x34495E, 0x7F8C8D),
        }
    }
}

fn hex(v: u32) -> Rgba {
    Rgba::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
}
