//! Saving files under content-derived names.

use std::time::SystemTime;

use cachet_common::{fingerprinted_name, fingerprinted_name_with_suffix, ContentHash};

use crate::error::StorageError;
use crate::storage::Storage;

/// Wraps a [`Storage`] so every saved file is named after its content.
///
/// `save("img/logo.png", bytes)` stores the bytes as
/// `img/logo.<hash12>.png`. If that name is already taken, a numeric suffix
/// is inserted before the fingerprint (`img/logo_1.<hash12>.png`,
/// `img/logo_2…`) until a free name is found. Reads and deletes pass
/// straight through to the inner store.
#[derive(Debug)]
pub struct HashedNameStorage<S> {
    inner: S,
}

impl<S: Storage> HashedNameStorage<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Returns the wrapped store.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Returns a reference to the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns the first free fingerprinted name for `content` saved as `name`.
    pub fn available_name(&self, name: &str, content: &[u8]) -> String {
        let mut candidate = fingerprinted_name(name, content);
        let mut counter = 1;
        while self.inner.exists(&candidate) {
            candidate = fingerprinted_name_with_suffix(name, content, Some(counter));
            counter += 1;
        }
        candidate
    }
}

impl<S: Storage> Storage for HashedNameStorage<S> {
    fn exists(&self, name: &str) -> bool {
        self.inner.exists(name)
    }

    fn open(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        self.inner.open(name)
    }

    fn save(&mut self, name: &str, content: &[u8]) -> Result<String, StorageError> {
        let target = self.available_name(name, content);
        if target != fingerprinted_name(name, content) {
            tracing::debug!(name, target = %target, "fingerprinted name taken, using suffixed name");
        }
        self.inner.save(&target, content)
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        self.inner.delete(name)
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        self.inner.list()
    }

    fn modified_time(&self, name: &str) -> Result<SystemTime, StorageError> {
        self.inner.modified_time(name)
    }

    fn content_hash(&self, name: &str) -> Result<ContentHash, StorageError> {
        self.inner.content_hash(name)
    }
}
