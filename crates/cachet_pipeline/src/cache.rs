//! Cache of logical name → fingerprinted name mappings.

use std::collections::HashMap;

use cachet_common::ContentHash;

/// Returns the content-addressed cache key for a logical asset name.
///
/// Keys have a fixed width regardless of name length, so they are safe for
/// external caches with key-length limits.
pub fn cache_key(name: &str) -> String {
    format!("cachet:hashed:{}", ContentHash::from_bytes(name.as_bytes()))
}

/// A store for fingerprinted names that outlives a single run.
///
/// Keys are produced by [`cache_key`]. Implementations may be shared
/// between processes (a memcached or Redis adapter, say); the pipeline only
/// needs point reads and batched writes.
pub trait NameCache {
    /// Returns the cached value for a key.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores many key/value pairs at once.
    fn set_many(&mut self, entries: Vec<(String, String)>);
}

/// An in-process [`NameCache`].
#[derive(Debug, Default, Clone)]
pub struct MemoryNameCache {
    entries: HashMap<String, String>,
}

impl MemoryNameCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NameCache for MemoryNameCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_many(&mut self, entries: Vec<(String, String)>) {
        self.entries.extend(entries);
    }
}
