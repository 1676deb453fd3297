//! CSS color parsing and conversion helpers.
//!
//! [`Color`] wraps [`DynamicColor`] from the `color` crate so styles can be
//! written as CSS strings (`"#ff0000"`, `"rgb(255, 0, 0)"`, `"steelblue"`) in
//! configuration files, while every backend gets the representation it needs:
//! hex for SVG and DrawingML, floating-point RGB for PDF.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{AlphaColor, DynamicColor, Srgb};

/// A parsed CSS color.
#[derive(Clone, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
        self.alpha().to_bits().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string.
    ///
    /// # Errors
    ///
    /// Returns a message naming the rejected string when it is not a valid
    /// CSS color.
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Color { color }),
            Err(err) => Err(format!("Invalid color '{color_str}': {err}")),
        }
    }

    /// Returns the color as clamped sRGB components in `0.0..=1.0`.
    pub fn to_rgb(&self) -> [f32; 3] {
        let [r, g, b, _] = self.color.to_alpha_color::<Srgb>().components;
        [r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)]
    }

    /// Returns the color as 8-bit sRGB components.
    pub fn to_rgb8(&self) -> [u8; 3] {
        self.to_rgb().map(|c| (c * 255.0).round() as u8)
    }

    /// Returns the alpha channel in `0.0..=1.0`.
    pub fn alpha(&self) -> f32 {
        self.color.to_alpha_color::<Srgb>().components[3].clamp(0.0, 1.0)
    }

    /// Returns the uppercase `RRGGBB` hex string, without a leading `#`.
    ///
    /// This is the form DrawingML expects in `<a:srgbClr val="..."/>`.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("{r:02X}{g:02X}{b:02X}")
    }

    /// Returns the `#rrggbb` form used in SVG attributes.
    pub fn to_css_hex(&self) -> String {
        format!("#{}", self.to_hex().to_lowercase())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self {
            color: DynamicColor::from_alpha_color(AlphaColor::<Srgb>::BLACK),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_css_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_named() {
        let color = Color::new("red").unwrap();
        assert_eq!(color.to_rgb8(), [255, 0, 0]);
        assert_eq!(color.to_hex(), "FF0000");
    }

    #[test]
    fn test_color_hex_roundtrip() {
        let color = Color::new("#1f77b4").unwrap();
        assert_eq!(color.to_css_hex(), "#1f77b4");
        assert_eq!(color.to_string(), "#1f77b4");
    }

    #[test]
    fn test_color_invalid() {
        let err = Color::new("not-a-color").unwrap_err();
        assert!(err.contains("not-a-color"));
    }

    #[test]
    fn test_color_default_is_black() {
        assert_eq!(Color::default().to_hex(), "000000");
        assert_eq!(Color::default().alpha(), 1.0);
    }
}
