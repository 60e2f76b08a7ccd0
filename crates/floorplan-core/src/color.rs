//! Serializable RGBA color used by elements, layers and palettes.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An 8-bit RGBA color that round-trips through serde and `#rrggbb` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Build a color from a packed `0xRRGGBB` value.
    pub const fn from_u32(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`. Returns `None` for anything else.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim().strip_prefix('#')?;
        if !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        match s.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Packed `0xRRGGBB` value (alpha dropped).
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parse() {
        assert_eq!(Rgba::from_hex("#6366f1"), Some(Rgba::rgb(0x63, 0x66, 0xf1)));
        assert_eq!(Rgba::from_hex("#ffffff80"), Some(Rgba::new(255, 255, 255, 128)));
        assert_eq!(Rgba::from_hex("6366f1"), None);
        assert_eq!(Rgba::from_hex("#12345"), None);
        assert_eq!(Rgba::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_display_formats_hex() {
        assert_eq!(Rgba::rgb(0x9c, 0xa3, 0xaf).to_string(), "#9ca3af");
        assert_eq!(Rgba::new(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_packed_u32() {
        let c = Rgba::from_u32(0x8b5a2b);
        assert_eq!(c, Rgba::rgb(0x8b, 0x5a, 0x2b));
        assert_eq!(c.to_u32(), 0x8b5a2b);
    }

    #[test]
    fn test_peniko_conversion() {
        let c = Rgba::new(10, 20, 30, 40);
        let color: Color = c.into();
        assert_eq!(Rgba::from(color), c);
    }
}
