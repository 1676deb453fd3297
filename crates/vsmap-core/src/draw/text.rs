//! Text styling and metrics.
//!
//! Text is measured with the Helvetica glyph widths in [`font`](super::font),
//! the face every backend draws with, so fitted labels stay inside their
//! boxes in each document format.

use crate::{color::Color, draw::font};

/// Horizontal placement of a text line inside its bounds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Left aligned (default)
    #[default]
    Start,
    /// Centered
    Middle,
    /// Right aligned
    End,
}

impl TextAlign {
    /// Returns the SVG `text-anchor` value.
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }

    /// Returns the DrawingML paragraph `algn` value.
    pub fn to_ooxml_value(self) -> &'static str {
        match self {
            Self::Start => "l",
            Self::Middle => "ctr",
            Self::End => "r",
        }
    }
}

/// Visual style of a single text line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    font_size: f32,
    bold: bool,
    color: Color,
    align: TextAlign,
}

impl TextStyle {
    /// Creates a regular, left-aligned black style.
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            bold: false,
            color: Color::default(),
            align: TextAlign::Start,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn align(&self) -> TextAlign {
        self.align
    }

    /// Height of one line of text in this style.
    pub fn line_height(&self) -> f32 {
        self.font_size * 1.25
    }

    /// Distance from the top of the line box to the baseline.
    pub fn ascent(&self) -> f32 {
        self.font_size * 0.9
    }

    /// Rendered width of `content` in this style.
    pub fn measure(&self, content: &str) -> f32 {
        font::text_width(content, self.font_size, self.bold)
    }

    /// Shortens `content` with a trailing `...` until it fits in `max_width`.
    pub fn fit(&self, content: &str, max_width: f32) -> String {
        if self.measure(content) <= max_width {
            return content.to_string();
        }

        let mut fitted: String = content.to_string();
        while !fitted.is_empty() {
            fitted.pop();
            let candidate = format!("{}...", fitted.trim_end());
            if self.measure(&candidate) <= max_width {
                return candidate;
            }
        }
        String::new()
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(10.0)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_measure_uses_glyph_widths() {
        let style = TextStyle::new(10.0);
        assert_approx_eq!(f32, style.measure("abcabc"), style.measure("abc") * 2.0);
        assert!(style.measure("WWW") > style.measure("iii"));
        assert!(style.clone().bold().measure("abc") > style.measure("abc"));
    }

    #[test]
    fn test_fit_wide_glyphs() {
        let style = TextStyle::new(9.0).bold();
        let name = format!("P1 {}", "W".repeat(40));

        let fitted = style.fit(&name, 138.0);
        assert!(fitted.starts_with("P1 W"));
        assert!(fitted.ends_with("..."));
        assert!(style.measure(&fitted) <= 138.0);
    }

    #[test]
    fn test_fit_keeps_short_text() {
        let style = TextStyle::new(10.0);
        assert_eq!(style.fit("Cut", 100.0), "Cut");
    }

    #[test]
    fn test_fit_truncates_long_text() {
        let style = TextStyle::new(10.0);
        let fitted = style.fit("Final assembly and packaging", 60.0);
        assert!(fitted.ends_with("..."));
        assert!(style.measure(&fitted) <= 60.0);
    }

    #[test]
    fn test_fit_nothing_fits() {
        let style = TextStyle::new(10.0);
        assert_eq!(style.fit("Assembly", 1.0), "");
    }

    #[test]
    fn test_text_align_values() {
        assert_eq!(TextAlign::Middle.to_svg_value(), "middle");
        assert_eq!(TextAlign::Middle.to_ooxml_value(), "ctr");
        assert_eq!(TextAlign::default(), TextAlign::Start);
    }
}
