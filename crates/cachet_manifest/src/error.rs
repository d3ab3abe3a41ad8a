//! Error types for manifest operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The requested key is not in the manifest.
    #[error("'{key}' is not in the manifest")]
    NotInManifest {
        /// The logical asset name that was looked up.
        key: String,
    },

    /// The manifest is misconfigured (unknown kind, bad path or pattern).
    #[error("manifest configuration error: {reason}")]
    Config {
        /// Description of the problem.
        reason: String,
    },

    /// An I/O error occurred while reading or writing the manifest file.
    #[error("manifest I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest file is not a JSON object of strings.
    #[error("failed to parse manifest {path}: {reason}")]
    Parse {
        /// The manifest file path.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },
}
