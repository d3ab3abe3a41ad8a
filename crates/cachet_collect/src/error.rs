//! Error types for collection and renaming.

use cachet_storage::StorageError;

/// Errors that can occur while collecting or renaming assets.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// The comparison method is unknown, or a store cannot provide the value
    /// it compares.
    #[error("unsupported comparison method '{method}'")]
    UnsupportedComparisonMethod {
        /// The method name as configured or as required by the comparator.
        method: String,
    },

    /// An ignore glob could not be compiled.
    #[error("invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Description of the compile error.
        reason: String,
    },

    /// A storage operation failed.
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for CollectError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UnsupportedComparisonMethod { method } => {
                Self::UnsupportedComparisonMethod { method }
            }
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_method_is_lifted_from_storage() {
        let err: CollectError = StorageError::UnsupportedComparisonMethod {
            method: "modified_time".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            CollectError::UnsupportedComparisonMethod { ref method } if method == "modified_time"
        ));
    }

    #[test]
    fn other_storage_errors_are_wrapped() {
        let err: CollectError = StorageError::NotFound {
            name: "a.css".to_string(),
        }
        .into();
        assert!(matches!(err, CollectError::Storage(_)));
        assert_eq!(err.to_string(), "'a.css' does not exist in storage");
    }
}
