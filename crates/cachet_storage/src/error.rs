//! Error types for storage operations.

use std::path::PathBuf;

/// Errors that can occur while reading from or writing to a [`Storage`](crate::Storage).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No file with the given name exists in the store.
    #[error("'{name}' does not exist in storage")]
    NotFound {
        /// The logical name that was looked up.
        name: String,
    },

    /// An I/O error occurred while accessing the backing file.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The name is empty, absolute, or escapes the storage root.
    #[error("invalid asset name '{name}'")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// The backend cannot provide the requested comparison value.
    #[error("storage does not support the '{method}' comparison method")]
    UnsupportedComparisonMethod {
        /// Name of the unsupported method (e.g. `modified_time`).
        method: String,
    },
}
