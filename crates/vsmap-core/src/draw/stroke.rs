//! Stroke and line-style definitions.
//!
//! [`StrokeDefinition`] carries everything a backend needs to draw an outline
//! or a line: color, width and dash style. Each [`StrokeStyle`] knows how to
//! express itself in the vocabularies of the three backends.
//!
//! # Quick Start
//!
//! ```
//! use vsmap_core::draw::{StrokeDefinition, StrokeStyle};
//! use vsmap_core::color::Color;
//!
//! let solid = StrokeDefinition::solid(Color::new("black").unwrap(), 2.0);
//! let dashed = StrokeDefinition::dashed(Color::new("teal").unwrap(), 1.5);
//! assert_eq!(dashed.style(), StrokeStyle::Dashed);
//! assert_eq!(solid.style().dash_pattern(), None);
//! ```

use std::str::FromStr;

use crate::color::Color;

/// Line pattern of a stroke.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashed line (6pt dash, 4pt gap)
    Dashed,
    /// Dotted line (2pt dot, 3pt gap)
    Dotted,
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            _ => Err(format!(
                "invalid stroke style `{s}`, valid values: solid, dashed, dotted"
            )),
        }
    }
}

impl StrokeStyle {
    /// Dash/gap lengths in points, or `None` for solid lines.
    ///
    /// Used directly by the PDF backend (`d` operator).
    pub fn dash_pattern(self) -> Option<[f32; 2]> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some([6.0, 4.0]),
            Self::Dotted => Some([2.0, 3.0]),
        }
    }

    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(self) -> Option<String> {
        self.dash_pattern().map(|[dash, gap]| format!("{dash},{gap}"))
    }

    /// Returns the DrawingML `<a:prstDash val="..."/>` value.
    pub fn to_ooxml_value(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dash",
            Self::Dotted => "sysDot",
        }
    }
}

/// A stroke definition for rendering lines and borders.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    /// Creates a solid stroke (convenience constructor).
    pub fn solid(color: Color, width: f32) -> Self {
        Self::new(color, width)
    }

    /// Creates a dashed stroke.
    pub fn dashed(color: Color, width: f32) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dashed)
    }

    /// Returns a copy of this stroke with a different style.
    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 1.0);
        assert_eq!(stroke.color().to_hex(), "000000");
        assert_eq!(stroke.style(), StrokeStyle::Solid);
    }

    #[test]
    fn test_stroke_constructors() {
        let color = Color::new("red").unwrap();

        let solid = StrokeDefinition::solid(color.clone(), 2.0);
        assert_eq!(solid.width(), 2.0);
        assert_eq!(solid.style(), StrokeStyle::Solid);

        let dashed = StrokeDefinition::dashed(color, 1.5);
        assert_eq!(dashed.style(), StrokeStyle::Dashed);
    }

    #[test]
    fn test_stroke_style_backend_values() {
        assert_eq!(StrokeStyle::Solid.to_svg_value(), None);
        assert_eq!(StrokeStyle::Dashed.to_svg_value(), Some("6,4".to_string()));
        assert_eq!(StrokeStyle::Dashed.to_ooxml_value(), "dash");
        assert_eq!(StrokeStyle::Dotted.dash_pattern(), Some([2.0, 3.0]));
    }

    #[test]
    fn test_stroke_style_from_str() {
        assert_eq!("dashed".parse::<StrokeStyle>(), Ok(StrokeStyle::Dashed));
        assert!("zigzag".parse::<StrokeStyle>().is_err());
    }
}
