//! Collector for accumulating diagnostics while reading rows.
//!
//! The [`DiagnosticCollector`] lets the loader report every bad cell of an
//! input at once instead of failing on the first one.

use log::warn;

use crate::error::{Diagnostic, LoadError};

#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Number of error diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity().is_error())
            .count()
    }

    /// Finish collection.
    ///
    /// Returns every diagnostic as a [`LoadError`] if any of them is an
    /// error. Otherwise warnings are logged and `Ok(())` is returned.
    pub fn finish(self) -> Result<(), LoadError> {
        if self.has_errors {
            return Err(LoadError::new(self.diagnostics));
        }

        for diagnostic in &self.diagnostics {
            warn!("{diagnostic}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_collector_empty_is_ok() {
        assert!(DiagnosticCollector::new().finish().is_ok());
    }

    #[test]
    fn test_collector_warnings_only_is_ok() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("unknown column `shift`"));
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_keeps_all_diagnostics() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::error("first").with_code(ErrorCode::E200));
        collector.emit(Diagnostic::warning("note"));
        collector.emit(Diagnostic::error("second").with_code(ErrorCode::E201));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 3);
    }
}
