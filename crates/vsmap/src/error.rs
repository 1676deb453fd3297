//! Error types for vsmap operations.
//!
//! This module provides the main error type [`VsmError`] which wraps the
//! error conditions of every pipeline stage.

use std::io;

use thiserror::Error;

use vsmap_parser::error::{ErrorKind, LoadError};

/// The main error type for vsmap operations.
///
/// # Diagnostic Variants
///
/// The `Schema` and `Parse` variants carry the loader diagnostics together
/// with the source text, so callers can render the offending rows.
#[derive(Debug, Error)]
pub enum VsmError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Schema error: {err}")]
    Schema { err: LoadError, src: String },

    #[error("Parse error: {err}")]
    Parse { err: LoadError, src: String },

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for VsmError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl VsmError {
    /// Wraps a loader error with its source, as `Schema` or `Parse` by kind.
    pub fn new_load_error(err: LoadError, src: impl Into<String>) -> Self {
        let src = src.into();
        match err.kind() {
            ErrorKind::Schema => Self::Schema { err, src },
            ErrorKind::Parse => Self::Parse { err, src },
        }
    }

    /// The loader error and source text, for `Schema` and `Parse` errors.
    pub fn load_error(&self) -> Option<(&LoadError, &str)> {
        match self {
            Self::Schema { err, src } | Self::Parse { err, src } => Some((err, src)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use vsmap_parser::error::{Diagnostic, ErrorCode};

    use super::*;

    #[test]
    fn test_new_load_error_by_kind() {
        let schema: LoadError = Diagnostic::error("missing column `defect_rate`")
            .with_code(ErrorCode::E100)
            .into();
        let err = VsmError::new_load_error(schema, "src");
        assert!(matches!(err, VsmError::Schema { .. }));
        assert_eq!(
            err.to_string(),
            "Schema error: error[E100]: missing column `defect_rate`"
        );

        let parse: LoadError = Diagnostic::error("bad").with_code(ErrorCode::E200).into();
        let err = VsmError::new_load_error(parse, "src");
        assert!(matches!(err, VsmError::Parse { .. }));
        assert_eq!(err.load_error().map(|(_, src)| src), Some("src"));
    }

    #[test]
    fn test_layout_error_message() {
        let err = VsmError::Layout("no process steps to lay out".to_string());
        assert_eq!(err.to_string(), "Layout error: no process steps to lay out");
        assert!(err.load_error().is_none());
    }
}
