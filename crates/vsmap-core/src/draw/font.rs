//! Glyph widths of the sans-serif face used by every backend.
//!
//! The PDF backend draws with the built-in Helvetica fonts and the PPTX and
//! SVG backends ask for Arial, which shares Helvetica's advance widths. The
//! tables below are the Adobe Font Metrics widths of Helvetica and
//! Helvetica-Bold for printable ASCII, in 1/1000 em.
//!
//! Characters outside printable ASCII are measured as `?`, the glyph the PDF
//! backend substitutes for them.

const FIRST: u32 = 0x20;
const FALLBACK: char = '?';

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    // 0x20
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0x30
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // 0x40
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    // 0x50
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // 0x60
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    // 0x70
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    // 0x20
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0x30
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    // 0x40
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    // 0x50
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    // 0x60
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    // 0x70
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Advance width of `c` in 1/1000 em.
pub fn glyph_width(c: char, bold: bool) -> u16 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    let index = |c: char| (c as u32).checked_sub(FIRST).map(|i| i as usize);

    index(c)
        .and_then(|i| table.get(i))
        .or_else(|| index(FALLBACK).and_then(|i| table.get(i)))
        .copied()
        .unwrap_or(0)
}

/// Rendered width of `content` at `font_size`, in the unit of `font_size`.
pub fn text_width(content: &str, font_size: f32, bold: bool) -> f32 {
    let units: u32 = content.chars().map(|c| u32::from(glyph_width(c, bold))).sum();
    units as f32 * font_size / 1000.0
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_glyph_widths() {
        assert_eq!(glyph_width(' ', false), 278);
        assert_eq!(glyph_width('W', false), 944);
        assert_eq!(glyph_width('W', true), 944);
        assert_eq!(glyph_width('i', false), 222);
        assert_eq!(glyph_width('i', true), 278);
        assert_eq!(glyph_width('~', true), 584);
    }

    #[test]
    fn test_unmapped_characters_measure_as_question_mark() {
        assert_eq!(glyph_width('é', false), glyph_width('?', false));
        assert_eq!(glyph_width('\t', true), glyph_width('?', true));
        assert_eq!(glyph_width('\u{7f}', false), glyph_width('?', false));
    }

    #[test]
    fn test_text_width() {
        assert_approx_eq!(f32, text_width("W", 10.0, true), 9.44);
        // P, 1, space, twenty W and an ellipsis in Helvetica-Bold at 9pt
        let title = format!("P1 {}...", "W".repeat(20));
        assert_approx_eq!(f32, text_width(&title, 9.0, true), 190.935, epsilon = 0.001);
        assert_approx_eq!(f32, text_width("", 12.0, false), 0.0);
    }
}
