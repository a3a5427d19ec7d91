//! Error types for docqa-vector.

use thiserror::Error;

/// Result type for docqa-vector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying an index.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Dimension mismatch between a vector and the index.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions.
        expected: usize,
        /// Actual dimensions provided.
        actual: usize,
    },

    /// Invalid vector (e.g., empty, contains NaN).
    #[error("Invalid vector: {0}")]
    InvalidVector(String),

    /// Invalid search parameters.
    #[error("Invalid search: {0}")]
    InvalidSearch(String),
}
