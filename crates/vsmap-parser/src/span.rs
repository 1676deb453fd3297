//! Byte ranges into the loaded source text.

use std::ops::Range;

/// A half-open byte range into the source text.
///
/// Spans let diagnostics point at the exact header cell or data row that
/// caused a problem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Span of the line that starts at `start` in `source`, excluding the line break.
    pub fn line_at(source: &str, start: usize) -> Self {
        let start = start.min(source.len());
        let rest = &source[start..];
        let len = rest.find(['\r', '\n']).unwrap_or(rest.len());
        Self::new(start..start + len)
    }

    /// Narrow a line span to its `index`-th comma separated field.
    ///
    /// Commas inside double quotes do not separate fields. Surrounding
    /// whitespace and quotes are left out of the result. Falls back to the
    /// whole line when it has fewer fields.
    pub fn field(self, source: &str, index: usize) -> Self {
        let Some(line) = source.get(self.start..self.end) else {
            return self;
        };

        let mut field = 0;
        let mut field_start = 0;
        let mut quoted = false;
        // A trailing separator closes the last field
        let bytes = line.bytes().enumerate().chain(std::iter::once((line.len(), b',')));
        for (offset, byte) in bytes {
            match byte {
                b'"' => quoted = !quoted,
                b',' if !quoted => {
                    if field == index {
                        return self.cell(line, field_start..offset);
                    }
                    field += 1;
                    field_start = offset + 1;
                }
                _ => {}
            }
        }
        self
    }

    /// The trimmed, unquoted content of `range` within `line`.
    fn cell(self, line: &str, range: Range<usize>) -> Self {
        let raw = &line[range.clone()];
        let mut start = range.start + (raw.len() - raw.trim_start().len());
        let mut end = start + raw.trim().len();
        let trimmed = &line[start..end];
        if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
            start += 1;
            end -= 1;
        }
        Self::new(self.start + start..self.start + end)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_at() {
        let source = "a,b\nccc,dd\r\nlast";
        assert_eq!(Span::line_at(source, 0), Span::new(0..3));
        assert_eq!(Span::line_at(source, 4), Span::new(4..10));
        assert_eq!(Span::line_at(source, 12), Span::new(12..16));
    }

    #[test]
    fn test_line_at_past_end() {
        let source = "abc";
        assert!(Span::line_at(source, 10).is_empty());
    }

    #[test]
    fn test_field() {
        let source = "Cut,abc,3\n";
        let line = Span::line_at(source, 0);
        assert_eq!(line.field(source, 0), Span::new(0..3));
        assert_eq!(line.field(source, 1), Span::new(4..7));
        assert_eq!(line.field(source, 2), Span::new(8..9));
        assert_eq!(line.field(source, 3), line);
    }

    #[test]
    fn test_field_repeated_value() {
        let source = "x,5x,5x";
        let line = Span::line_at(source, 0);
        let span = line.field(source, 2);
        assert_eq!(span, Span::new(5..7));
        assert_eq!(&source[span.start()..span.end()], "5x");
    }

    #[test]
    fn test_field_quoted_and_padded() {
        let source = "\"a, b\" ,  c ,";
        let line = Span::line_at(source, 0);
        assert_eq!(line.field(source, 0), Span::new(1..5));
        assert_eq!(line.field(source, 1), Span::new(10..11));
        assert!(line.field(source, 2).is_empty());
    }
}
