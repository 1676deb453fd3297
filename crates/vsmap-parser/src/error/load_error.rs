//! The [`LoadError`] type wrapping loader diagnostics.

use std::fmt;

use crate::error::{Diagnostic, ErrorKind};

/// Error type for loading a process-step table.
///
/// Wraps one or more diagnostics. [`LoadError::kind`] tells schema problems
/// (wrong header) apart from parse problems (bad rows or values).
#[derive(Debug)]
pub struct LoadError {
    diagnostics: Vec<Diagnostic>,
}

impl LoadError {
    /// Create a new load error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Schema if any error diagnostic carries a schema code, Parse otherwise.
    pub fn kind(&self) -> ErrorKind {
        let is_schema = self
            .diagnostics
            .iter()
            .filter(|d| d.severity().is_error())
            .filter_map(Diagnostic::code)
            .any(|code| code.kind() == ErrorKind::Schema);

        if is_schema {
            ErrorKind::Schema
        } else {
            ErrorKind::Parse
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{first}")?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for LoadError {}

impl From<Diagnostic> for LoadError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_load_error_display_single() {
        let err: LoadError = Diagnostic::error("missing column").into();
        assert_eq!(err.to_string(), "error: missing column");
    }

    #[test]
    fn test_load_error_display_multiple() {
        let err = LoadError::new(vec![
            Diagnostic::error("first error"),
            Diagnostic::error("second error"),
            Diagnostic::error("third error"),
        ]);
        assert_eq!(err.to_string(), "error: first error (+2 more)");
    }

    #[test]
    fn test_load_error_kind() {
        let schema: LoadError = Diagnostic::error("x").with_code(ErrorCode::E100).into();
        assert_eq!(schema.kind(), ErrorKind::Schema);

        let parse: LoadError = Diagnostic::error("x").with_code(ErrorCode::E200).into();
        assert_eq!(parse.kind(), ErrorKind::Parse);

        let uncoded: LoadError = Diagnostic::error("x").into();
        assert_eq!(uncoded.kind(), ErrorKind::Parse);
    }
}
