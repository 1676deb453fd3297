//! Error and diagnostic system for the CSV loader.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Labeled spans pointing at the offending header cell or data row
//! - Severity levels
//! - A collector that gathers every bad cell before failing
//!
//! # Example
//!
//! ```
//! # use vsmap_parser::error::{Diagnostic, ErrorCode};
//! # use vsmap_parser::Span;
//! let diag = Diagnostic::error("row 2: `wait_time` value `soon` is not a number")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(40..44), "expected a number")
//!     .with_help("leave the cell empty if the value is unknown");
//! assert_eq!(diag.code(), Some(ErrorCode::E200));
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod load_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::{ErrorCode, ErrorKind};
pub use label::Label;
pub use load_error::LoadError;
pub use severity::Severity;
