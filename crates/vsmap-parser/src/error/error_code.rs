//! Error codes for the loader diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - CSV syntax errors
//! - `E1xx` - Schema (header) errors
//! - `E2xx` - Value errors in data rows

use std::fmt;

/// Which class of failure an error code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The header does not match the expected columns.
    Schema,
    /// A data row could not be read or a value could not be coerced.
    Parse,
}

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // CSV Syntax Errors (E0xx)
    // =========================================================================
    /// Malformed record.
    ///
    /// A data row has a different number of fields than the header, or the
    /// CSV reader could not decode it.
    E001,

    // =========================================================================
    // Schema Errors (E1xx)
    // =========================================================================
    /// Missing required column.
    ///
    /// One or more of `step_name`, `cycle_time`, `wait_time`, `defect_rate`,
    /// `inventory`, `flow_type`, `notes` is absent from the header.
    E100,

    /// Duplicate column.
    ///
    /// Two header cells name the same column (after normalization and alias
    /// resolution).
    E101,

    /// Missing header.
    ///
    /// The input is empty, so there is no header row to read.
    E102,

    // =========================================================================
    // Value Errors (E2xx)
    // =========================================================================
    /// Invalid number.
    ///
    /// A numeric column holds a value that is not a finite number.
    E200,

    /// Invalid flow type.
    ///
    /// The `flow_type` column holds something other than `Push` or `Pull`.
    E201,

    /// Empty step name.
    E202,
}

impl ErrorCode {
    /// The class of failure this code reports.
    pub fn kind(self) -> ErrorKind {
        match self {
            Self::E100 | Self::E101 | Self::E102 => ErrorKind::Schema,
            Self::E001 | Self::E200 | Self::E201 | Self::E202 => ErrorKind::Parse,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::E001 => "E001",
            Self::E100 => "E100",
            Self::E101 => "E101",
            Self::E102 => "E102",
            Self::E200 => "E200",
            Self::E201 => "E201",
            Self::E202 => "E202",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E202.to_string(), "E202");
    }

    #[test]
    fn test_error_code_kind() {
        assert_eq!(ErrorCode::E100.kind(), ErrorKind::Schema);
        assert_eq!(ErrorCode::E102.kind(), ErrorKind::Schema);
        assert_eq!(ErrorCode::E001.kind(), ErrorKind::Parse);
        assert_eq!(ErrorCode::E200.kind(), ErrorKind::Parse);
    }
}
