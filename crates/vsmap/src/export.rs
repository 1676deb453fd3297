//! Export of finished maps to document formats.
//!
//! Every backend replays the same [`Canvas`](vsmap_core::draw::Canvas) through
//! the [`DrawTarget`](vsmap_core::draw::DrawTarget) trait, so the map looks the
//! same in each format. Backends return the document bytes; writing files is
//! left to [`MapBuilder::write_outputs`](crate::MapBuilder::write_outputs).
//!
//! # Available Backends
//!
//! - [`pptx::PptxExporter`]: map slide plus an appendix table slide
//! - [`pdf::PdfExporter`]: map page plus paginated appendix pages
//! - [`svg::SvgExporter`]: single SVG image of the map

pub mod appendix;
pub mod pdf;
pub mod pptx;
pub mod svg;

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::map::ValueStreamMap;

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Pptx,
    Pdf,
    Svg,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Pptx, Format::Pdf, Format::Svg];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pptx => "pptx",
            Self::Pdf => "pdf",
            Self::Svg => "svg",
        }
    }

    /// The exporter producing this format.
    pub fn exporter(self) -> Box<dyn Exporter> {
        match self {
            Self::Pptx => Box::new(pptx::PptxExporter),
            Self::Pdf => Box::new(pdf::PdfExporter),
            Self::Svg => Box::new(svg::SvgExporter),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pptx" => Ok(Self::Pptx),
            "pdf" => Ok(Self::Pdf),
            "svg" => Ok(Self::Svg),
            _ => Err(format!(
                "invalid format `{s}`, valid values: pptx, pdf, svg"
            )),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A document backend.
pub trait Exporter {
    /// Renders `map` into the bytes of one document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the map cannot be expressed in the format,
    /// or [`Error::Archive`]/[`Error::Io`] if assembling the document fails.
    fn export(&self, map: &ValueStreamMap) -> Result<Vec<u8>, Error>;
}

/// Errors that can occur while producing a document.
///
/// Converted into [`VsmError::Export`](crate::VsmError::Export) at the crate
/// boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// A rendering or conversion failure described by the message.
    #[error("Render error: {0}")]
    Render(String),

    /// An I/O error while assembling the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The PPTX container could not be written.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Escapes text for use in XML content and attribute values.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // Control characters are not allowed in XML 1.0
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("PPTX".parse::<Format>(), Ok(Format::Pptx));
        assert_eq!(" pdf ".parse::<Format>(), Ok(Format::Pdf));
        assert_eq!("svg".parse::<Format>(), Ok(Format::Svg));
        assert!("docx".parse::<Format>().is_err());
    }

    #[test]
    fn test_format_display_is_extension() {
        for format in Format::ALL {
            assert_eq!(format.to_string(), format.extension());
        }
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_xml("bell\u{7}"), "bell");
        assert_eq!(escape_xml("line\nbreak"), "line\nbreak");
    }

    #[test]
    fn test_error_display() {
        let err = Error::Render("bad page".to_string());
        assert_eq!(err.to_string(), "Render error: bad page");
    }
}
