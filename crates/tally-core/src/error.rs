//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── ParseError  - One line rejected (recoverable, line is skipped)    │
//! │  └── CoreError   - Aggregation precondition violated (caller error)    │
//! │                                                                         │
//! │  tally-io errors (separate crate)                                      │
//! │  └── IoError     - Missing inputs, read/write failures                 │
//! │                                                                         │
//! │  Flow: ParseError → logged & skipped                                   │
//! │        CoreError  → IoError → logged by the pipeline                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Aggregation errors.
///
/// An empty input to a report generator is reported instead of producing an
/// empty report, because an empty report file reads like "nobody sold
/// anything".
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// No accepted sales were handed to a report generator.
    #[error("cannot build a report without sales")]
    NoSales,

    /// The product report was requested with an empty catalog.
    #[error("cannot build the product report without a product catalog")]
    NoProducts,
}

// =============================================================================
// Parse Error
// =============================================================================

/// Reasons a single delimited line is rejected.
///
/// Loaders log these at warning level and move on to the next line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The line does not have exactly the number of fields its schema needs.
    #[error("expected {expected} fields, found {found}")]
    WrongFieldCount { expected: usize, found: usize },

    /// A numeric field could not be converted.
    #[error("{field} is not a valid number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

impl ParseError {
    /// Creates an InvalidNumber error for a field and its raw text.
    pub fn invalid_number(field: &'static str, value: impl Into<String>) -> Self {
        ParseError::InvalidNumber {
            field,
            value: value.into(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result of parsing one line.
pub type ParseResult<T> = Result<T, ParseError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ParseError::WrongFieldCount {
            expected: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "expected 3 fields, found 2");

        let err = ParseError::invalid_number("unitPrice", "ten");
        assert_eq!(err.to_string(), "unitPrice is not a valid number: 'ten'");
    }

    #[test]
    fn test_core_errors_are_aggregation_preconditions() {
        assert_eq!(CoreError::NoSales.to_string(), "cannot build a report without sales");
        assert_eq!(
            CoreError::NoProducts.to_string(),
            "cannot build the product report without a product catalog"
        );
    }
}
