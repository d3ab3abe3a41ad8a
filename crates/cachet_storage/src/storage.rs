//! The storage contract shared by every backend.

use std::time::SystemTime;

use cachet_common::ContentHash;

use crate::error::StorageError;

/// A store of named assets.
///
/// Names are `/`-separated logical paths relative to the store root
/// (`css/app.css`). Reads take `&self`; writes take `&mut self` so a
/// destination store has a single writer during a run.
pub trait Storage {
    /// Returns `true` if a file with this name exists.
    fn exists(&self, name: &str) -> bool;

    /// Reads the full contents of a file.
    fn open(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Writes `content` under `name`, replacing any existing file, and
    /// returns the name the content was actually stored under.
    fn save(&mut self, name: &str, content: &[u8]) -> Result<String, StorageError>;

    /// Removes a file.
    fn delete(&mut self, name: &str) -> Result<(), StorageError>;

    /// Lists every stored name in sorted order.
    fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Returns the last modification time of a file.
    ///
    /// Backends without timestamps keep the default, which fails with
    /// [`StorageError::UnsupportedComparisonMethod`].
    fn modified_time(&self, name: &str) -> Result<SystemTime, StorageError> {
        let _ = name;
        Err(StorageError::UnsupportedComparisonMethod {
            method: "modified_time".to_string(),
        })
    }

    /// Returns the content hash of a file.
    ///
    /// The default reads the whole file; remote backends that can report a
    /// digest without a download should override it.
    fn content_hash(&self, name: &str) -> Result<ContentHash, StorageError> {
        Ok(ContentHash::from_bytes(&self.open(name)?))
    }
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }

    fn open(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        (**self).open(name)
    }

    fn save(&mut self, name: &str, content: &[u8]) -> Result<String, StorageError> {
        (**self).save(name, content)
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        (**self).delete(name)
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        (**self).list()
    }

    fn modified_time(&self, name: &str) -> Result<SystemTime, StorageError> {
        (**self).modified_time(name)
    }

    fn content_hash(&self, name: &str) -> Result<ContentHash, StorageError> {
        (**self).content_hash(name)
    }
}

/// Splits a logical name into its path components, rejecting names that
/// are empty, absolute, or step outside the store root.
pub(crate) fn name_components(name: &str) -> Result<Vec<&str>, StorageError> {
    let invalid = || StorageError::InvalidName {
        name: name.to_string(),
    };
    if name.is_empty() || name.starts_with('/') || name.contains('\\') {
        return Err(invalid());
    }
    let mut components = Vec::new();
    for part in name.split('/') {
        match part {
            "" | "." => {}
            ".." => return Err(invalid()),
            part => components.push(part),
        }
    }
    if components.is_empty() {
        return Err(invalid());
    }
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_of_nested_name() {
        assert_eq!(
            name_components("css/vendor/reset.css").unwrap(),
            vec!["css", "vendor", "reset.css"]
        );
    }

    #[test]
    fn components_skip_empty_and_current_dir() {
        assert_eq!(name_components("css//./app.css").unwrap(), vec!["css", "app.css"]);
    }

    #[test]
    fn rejects_escaping_names() {
        for name in ["", "/etc/passwd", "../secret", "css/../../x", "a\\b", "./"] {
            assert!(
                matches!(name_components(name), Err(StorageError::InvalidName { .. })),
                "{name:?} should be rejected"
            );
        }
    }
}
