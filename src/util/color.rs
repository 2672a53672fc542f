use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A 24-bit RGB color stored as `0xRRGGBB`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Pure white.
    pub const WHITE: Self = Self(0xffffff);

    /// Color from a `0xRRGGBB` literal. Bits above 24 are dropped.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    /// Channels as floats in [0, 1].
    #[must_use]
    pub fn to_rgb(self) -> [f32; 3] {
        let r = (self.0 >> 16) & 0xff;
        let g = (self.0 >> 8) & 0xff;
        let b = self.0 & 0xff;
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }

    /// Channels plus the given alpha.
    #[must_use]
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.to_rgb();
        [r, g, b, alpha]
    }

    /// CSS-style `#rrggbb` string, as hosts draw label text with it.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("#{:06x}", self.0)
    }

    /// Parse a `#rrggbb` string back into a color.
    #[must_use]
    pub fn from_css(css: &str) -> Option<Self> {
        let hex = css.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self)
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_split_from_hex() {
        let c = Color::from_hex(0xff8800);
        let [r, g, b] = c.to_rgb();
        assert_eq!(r, 1.0);
        assert!((g - 0x88 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(b, 0.0);
    }

    #[test]
    fn css_string_is_zero_padded() {
        assert_eq!(Color::from_hex(0x00d9ff).to_css(), "#00d9ff");
        assert_eq!(Color::from_hex(0xff_00d9ff).to_css(), "#00d9ff");
    }

    #[test]
    fn css_string_parses_back() {
        assert_eq!(Color::from_css("#00d9ff"), Some(Color(0x00d9ff)));
        assert_eq!(Color::from_css("00d9ff"), None);
        assert_eq!(Color::from_css("#fff"), None);
        assert_eq!(Color::from_css("#gg0000"), None);
    }
}
