use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color with f32 components in [0.0, 1.0] range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new RGBA color.
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit channel values.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Create a color from a hex string (e.g., "#FF0000" or "#FF0000FF").
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let hex = hex.trim_start_matches('#');
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| ColorError::InvalidHex)?;
                let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| ColorError::InvalidHex)?;
                let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| ColorError::InvalidHex)?;
                Ok(Self::from_rgb8(r, g, b))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| ColorError::InvalidHex)?;
                let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| ColorError::InvalidHex)?;
                let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| ColorError::InvalidHex)?;
                let a = u8::from_str_radix(&hex[6..8], 16).map_err(|_| ColorError::InvalidHex)?;
                Ok(Self::rgba(
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                    a as f32 / 255.0,
                ))
            }
            _ => Err(ColorError::InvalidHex),
        }
    }

    /// Look up a color from the fixed named palette (case-insensitive).
    /// Returns None for names outside the palette.
    pub fn named(name: &str) -> Option<Color> {
        let color = match name.trim().to_ascii_uppercase().as_str() {
            "WHITE" => Color::WHITE,
            "BLUE" => Color::BLUE,
            "YELLOW" => Color::YELLOW,
            "RED" => Color::RED,
            "GREEN" => Color::GREEN,
            "PINK" => Color::PINK,
            "ORANGE" => Color::ORANGE,
            "PURPLE" => Color::PURPLE,
            "GRAY" => Color::GRAY,
            "LIGHT_GRAY" => Color::LIGHT_GRAY,
            "DARK_GRAY" => Color::DARK_GRAY,
            _ => return None,
        };
        Some(color)
    }

    /// Resolve a color string as it appears in a scene document: a palette
    /// name first, then a hex literal, falling back to WHITE for anything
    /// unrecognized.
    pub fn resolve(raw: &str) -> Color {
        Color::named(raw)
            .or_else(|| Color::from_hex(raw).ok())
            .unwrap_or(Color::WHITE)
    }

    /// Convert to RGBA u8 channels.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r * 255.0).clamp(0.0, 255.0) as u8,
            (self.g * 255.0).clamp(0.0, 255.0) as u8,
            (self.b * 255.0).clamp(0.0, 255.0) as u8,
            (self.a * 255.0).clamp(0.0, 255.0) as u8,
        ]
    }

    // --- Named palette ---

    pub const WHITE: Color = Color::from_rgb8(0xFF, 0xFF, 0xFF);
    pub const BLUE: Color = Color::from_rgb8(0x58, 0xC4, 0xDD);
    pub const YELLOW: Color = Color::from_rgb8(0xFF, 0xFF, 0x00);
    pub const RED: Color = Color::from_rgb8(0xFC, 0x62, 0x55);
    pub const GREEN: Color = Color::from_rgb8(0x83, 0xC1, 0x67);
    pub const PINK: Color = Color::from_rgb8(0xD1, 0x47, 0xBD);
    pub const ORANGE: Color = Color::from_rgb8(0xFF, 0x86, 0x2F);
    pub const PURPLE: Color = Color::from_rgb8(0x9A, 0x72, 0xAC);
    pub const GRAY: Color = Color::from_rgb8(0x88, 0x88, 0x88);
    pub const LIGHT_GRAY: Color = Color::from_rgb8(0xBB, 0xBB, 0xBB);
    pub const DARK_GRAY: Color = Color::from_rgb8(0x44, 0x44, 0x44);
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex color string")]
    InvalidHex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_palette_lookup() {
        assert_eq!(Color::named("BLUE"), Some(Color::BLUE));
        assert_eq!(Color::named("blue"), Some(Color::BLUE));
        assert_eq!(Color::named(" Light_Gray "), Some(Color::LIGHT_GRAY));
        assert_eq!(Color::named("chartreuse"), None);
    }

    #[test]
    fn test_resolve_falls_back_to_white() {
        assert_eq!(Color::resolve("banana"), Color::WHITE);
        assert_eq!(Color::resolve(""), Color::WHITE);
    }

    #[test]
    fn test_resolve_accepts_hex() {
        let c = Color::resolve("#FF8800");
        assert_eq!(c.to_rgba8(), [255, 136, 0, 255]);
    }

    #[test]
    fn test_color_from_hex_rgba() {
        let c = Color::from_hex("#FF880080").unwrap();
        assert_eq!(c.to_rgba8(), [255, 136, 0, 128]);
    }

    #[test]
    fn test_color_from_hex_invalid() {
        assert!(Color::from_hex("invalid").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
    }

    #[test]
    fn test_color_display() {
        assert_eq!(format!("{}", Color::WHITE), "#FFFFFF");
        assert_eq!(format!("{}", Color::rgba(1.0, 0.0, 0.0, 0.5)), "#FF00007F");
    }
}
