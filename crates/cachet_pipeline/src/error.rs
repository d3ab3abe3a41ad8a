//! Error types for the post-process pipeline.

use cachet_storage::StorageError;

/// Errors that can occur while fingerprinting and rewriting assets.
///
/// Under [`ErrorPolicy::Lax`](crate::ErrorPolicy::Lax), `ContentUnavailable`
/// and `BrokenReference` are recovered per file and counted instead of
/// aborting the run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The bytes of an asset could not be read or decoded.
    #[error("content of '{name}' is unavailable: {reason}")]
    ContentUnavailable {
        /// The asset name.
        name: String,
        /// Why the content could not be obtained.
        reason: String,
    },

    /// A reference embedded in a text asset could not be resolved.
    #[error("broken reference '{reference}' in '{name}': {reason}")]
    BrokenReference {
        /// The asset containing the reference.
        name: String,
        /// The reference as written in the asset.
        reference: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A glob or regular expression in the configuration is invalid.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Description of the problem.
        reason: String,
    },

    /// Writing to or deleting from the destination store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_unavailable_display() {
        let err = PipelineError::ContentUnavailable {
            name: "img/x.png".to_string(),
            reason: "'img/x.png' does not exist in storage".to_string(),
        };
        assert!(err.to_string().starts_with("content of 'img/x.png' is unavailable"));
    }

    #[test]
    fn broken_reference_display() {
        let err = PipelineError::BrokenReference {
            name: "css/app.css".to_string(),
            reference: "../img/missing.png".to_string(),
            reason: "not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'../img/missing.png'"));
        assert!(msg.contains("'css/app.css'"));
    }

    #[test]
    fn storage_error_is_transparent() {
        let err: PipelineError = StorageError::NotFound {
            name: "a.js".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "'a.js' does not exist in storage");
    }
}
