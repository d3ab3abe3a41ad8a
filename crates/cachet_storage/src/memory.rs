//! In-memory storage backend.

use std::collections::BTreeMap;
use std::time::SystemTime;

use crate::error::StorageError;
use crate::storage::{name_components, Storage};

#[derive(Debug, Clone)]
struct MemoryFile {
    content: Vec<u8>,
    modified: SystemTime,
}

/// A [`Storage`] that keeps every file in memory.
///
/// Used for dry runs and as a test double for remote destinations.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: BTreeMap<String, MemoryFile>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `(name, content)` pairs.
    pub fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a [u8])>) -> Self {
        let mut storage = Self::new();
        for (name, content) in files {
            storage.insert(name, content, SystemTime::now());
        }
        storage
    }

    /// Inserts a file with an explicit modification time.
    pub fn insert(&mut self, name: &str, content: &[u8], modified: SystemTime) {
        self.files.insert(
            name.to_string(),
            MemoryFile {
                content: content.to_vec(),
                modified,
            },
        );
    }

    /// Overrides the modification time of an existing file.
    pub fn set_modified_time(&mut self, name: &str, modified: SystemTime) -> Result<(), StorageError> {
        let file = self.files.get_mut(name).ok_or_else(|| StorageError::NotFound {
            name: name.to_string(),
        })?;
        file.modified = modified;
        Ok(())
    }

    /// Returns the number of stored files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no files are stored.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn get(&self, name: &str) -> Result<&MemoryFile, StorageError> {
        self.files.get(name).ok_or_else(|| StorageError::NotFound {
            name: name.to_string(),
        })
    }
}

impl Storage for MemoryStorage {
    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn open(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        Ok(self.get(name)?.content.clone())
    }

    fn save(&mut self, name: &str, content: &[u8]) -> Result<String, StorageError> {
        let name = name_components(name)?.join("/");
        self.insert(&name, content, SystemTime::now());
        Ok(name)
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        self.files
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound {
                name: name.to_string(),
            })
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.files.keys().cloned().collect())
    }

    fn modified_time(&self, name: &str) -> Result<SystemTime, StorageError> {
        Ok(self.get(name)?.modified)
    }
}
