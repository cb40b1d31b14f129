//! Error types for the billing driver.

use std::path::PathBuf;

use line_billing_core::{ContractError, PhoneNumber};

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors that can occur while loading a dataset or running a billing pass.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// A file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// JSON could not be parsed or produced.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Two lines in a dataset share a number.
    #[error("duplicate phone line: {0}")]
    DuplicateLine(PhoneNumber),

    /// A record refers to a line that is not in the dataset.
    #[error("unknown phone line: {0}")]
    UnknownLine(PhoneNumber),

    /// A contract rejected an operation.
    #[error("contract error on line {number}: {source}")]
    Contract {
        /// The line whose contract failed.
        number: PhoneNumber,
        /// The underlying contract error.
        source: ContractError,
    },
}

impl DriverError {
    /// Wrap an I/O error with the path it happened on.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
