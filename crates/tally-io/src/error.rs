//! # I/O Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / csv::Error / CoreError                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  IoError (this module) ← Adds the path that failed                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pipeline logs it and records it in the RunSummary                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use tally_core::CoreError;
use thiserror::Error;

/// File layer errors.
#[derive(Debug, Error)]
pub enum IoError {
    /// An input file or directory does not exist.
    #[error("input not found: {}", path.display())]
    MissingInput { path: PathBuf },

    /// Reading or writing a path failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited reader or writer failed.
    #[error("delimited file error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The aggregation engine refused its input.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The run summary could not be serialized.
    #[error("summary serialization failed: {0}")]
    Summary(#[from] serde_json::Error),
}

impl IoError {
    /// Creates a MissingInput error for a path.
    pub fn missing(path: impl AsRef<Path>) -> Self {
        IoError::MissingInput {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Wraps a std I/O error with the path involved.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        IoError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wraps a csv error with the path involved.
    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        IoError::Csv {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type for file operations.
pub type IoResult<T> = Result<T, IoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = IoError::missing("files/info/products.csv");
        assert_eq!(err.to_string(), "input not found: files/info/products.csv");

        let err: IoError = CoreError::NoSales.into();
        assert_eq!(err.to_string(), "cannot build a report without sales");
    }
}
