//! Read-side cache for manifest lookups.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use crate::error::ManifestError;
use crate::store::read_entries;

/// Entries loaded from one version of the manifest file.
#[derive(Debug, Default)]
struct Loaded {
    /// Modification time of the file the entries came from; `None` when the
    /// file did not exist.
    modified: Option<SystemTime>,
    entries: HashMap<String, String>,
}

/// Caches manifest entries keyed by the manifest file's modification time.
///
/// The first lookup for a given file version loads every entry at once;
/// later lookups are served from memory until the file's modification time
/// changes, which drops all cached entries. Safe to share between threads.
#[derive(Debug, Default)]
pub struct ManifestLookup {
    state: Mutex<Option<Loaded>>,
}

impl ManifestLookup {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `key` in the manifest at `path`.
    ///
    /// A missing manifest file behaves like an empty one.
    pub fn get(&self, path: &Path, key: &str) -> Result<String, ManifestError> {
        let modified = modified_time(path)?;
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let stale = state.as_ref().map_or(true, |loaded| loaded.modified != modified);
        if stale {
            tracing::debug!(path = %path.display(), "loading manifest into lookup cache");
            let entries = match modified {
                Some(_) => read_entries(path)?.into_iter().collect(),
                None => HashMap::new(),
            };
            *state = Some(Loaded { modified, entries });
        }

        state
            .as_ref()
            .and_then(|loaded| loaded.entries.get(key))
            .cloned()
            .ok_or_else(|| ManifestError::NotInManifest {
                key: key.to_string(),
            })
    }

    /// Drops every cached entry.
    pub fn invalidate(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Number of entries currently cached.
    pub fn cached_len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(0, |loaded| loaded.entries.len())
    }
}

fn modified_time(path: &Path) -> Result<Option<SystemTime>, ManifestError> {
    let io = |source: std::io::Error| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    };
    match std::fs::metadata(path) {
        Ok(meta) => meta.modified().map(Some).map_err(io),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io(e)),
    }
}
