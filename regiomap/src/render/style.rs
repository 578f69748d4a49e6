//! Color and styling types.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// An RGBA color.
///
/// Parses from `#rrggbb` or `#rrggbbaa` hex notation, the form the
/// configuration file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    /// Create an opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with explicit alpha.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Hex form without alpha (`#rrggbb`), as SVG fill/stroke attributes
    /// expect; opacity is emitted separately.
    pub fn hex_rgb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0.0-1.0 opacity value.
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl FromStr for Rgba {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{s}' must start with '#'"))?;
        if !hex.is_ascii() {
            return Err(format!("color '{s}' has invalid hex digits"));
        }
        let parse_pair = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("color '{s}' has invalid hex digits"))
        };
        match hex.len() {
            6 => Ok(Rgba::opaque(parse_pair(0)?, parse_pair(2)?, parse_pair(4)?)),
            8 => Ok(Rgba::new(
                parse_pair(0)?,
                parse_pair(2)?,
                parse_pair(4)?,
                parse_pair(6)?,
            )),
            _ => Err(format!("color '{s}' must be #rrggbb or #rrggbbaa")),
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

/// The fill and border colors for the three map layers.
#[derive(Debug, Clone)]
pub struct ColorScheme {
    /// Primary territory fill.
    pub primary: Rgba,
    /// Neighboring territory fill.
    pub secondary: Rgba,
    /// Border stroke for all layers.
    pub border: Rgba,
    /// Highlight fill, drawn last.
    pub highlight: Rgba,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            primary: Rgba::opaque(0xd9, 0xd9, 0xd9),
            secondary: Rgba::opaque(0xf0, 0xf0, 0xf0),
            border: Rgba::opaque(0x40, 0x40, 0x40),
            highlight: Rgba::opaque(0xe4, 0x6c, 0x0a),
        }
    }
}

/// Background styling of an output image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// No background; pixels outside the geometry stay fully transparent.
    Transparent,
    /// Opaque fill with the given color.
    Opaque(Rgba),
}

/// Visual styling of the scale bar; the computed spec carries placement and
/// length, this carries how it is drawn.
#[derive(Debug, Clone)]
pub struct ScaleBarStyle {
    /// Bar, tick and label color.
    pub color: Rgba,
    /// Bar line width in points.
    pub line_width: f32,
    /// Label glyph height in points.
    pub font_size: f32,
}

impl Default for ScaleBarStyle {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            line_width: 1.5,
            font_size: 8.0,
        }
    }
}
