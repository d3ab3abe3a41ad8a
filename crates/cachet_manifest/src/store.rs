//! Manifest store trait and its JSON file implementation.
//!
//! The on-disk format is a single flat JSON object mapping logical asset
//! names to URLs, keys sorted, indented by four spaces:
//!
//! ```json
//! {
//!     "css/app.css": "/static/css/app.0123456789ab.css",
//!     "js/app.js": "/static/js/app.ba9876543210.js"
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ManifestError;
use crate::lookup::ManifestLookup;

/// Kind name selecting [`JsonManifest`] in [`open_manifest`].
pub const JSON_KIND: &str = "json";

/// A persisted mapping from logical asset names to public URLs.
///
/// Writers call [`clear`](Manifest::clear) (optionally), then
/// [`add`](Manifest::add) per entry, then [`flush`](Manifest::flush).
/// Readers call [`get`](Manifest::get).
pub trait Manifest {
    /// Marks the working set as authoritative: the next flush replaces the
    /// stored manifest instead of merging into it. Nothing is written yet.
    fn clear(&mut self);

    /// Inserts or replaces one entry in the working set.
    fn add(&mut self, key: &str, value: &str);

    /// Writes the working set out and resets it.
    fn flush(&mut self) -> Result<(), ManifestError>;

    /// Returns the stored URL for `key`.
    fn get(&self, key: &str) -> Result<String, ManifestError>;
}

/// Opens the manifest implementation named by `kind`.
///
/// Only [`JSON_KIND`] is known; anything else is a configuration error.
pub fn open_manifest(kind: &str, path: &Path) -> Result<Box<dyn Manifest>, ManifestError> {
    if path.as_os_str().is_empty() {
        return Err(ManifestError::Config {
            reason: "manifest path is empty".to_string(),
        });
    }
    match kind {
        JSON_KIND => Ok(Box::new(JsonManifest::new(path))),
        other => Err(ManifestError::Config {
            reason: format!("unknown manifest kind '{other}' (expected '{JSON_KIND}')"),
        }),
    }
}

/// A manifest stored as a JSON file.
#[derive(Debug)]
pub struct JsonManifest {
    path: PathBuf,
    cleared: bool,
    entries: BTreeMap<String, String>,
    lookup: ManifestLookup,
}

impl JsonManifest {
    /// Creates a manifest backed by the file at `path`. The file need not
    /// exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cleared: false,
            entries: BTreeMap::new(),
            lookup: ManifestLookup::new(),
        }
    }

    /// Returns the manifest file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries waiting to be flushed.
    pub fn pending_len(&self) -> usize {
        self.entries.len()
    }

    /// Loads every entry stored on disk. A missing file is empty.
    pub fn load(&self) -> Result<BTreeMap<String, String>, ManifestError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        read_entries(&self.path)
    }

    fn write_atomic(&self, entries: &BTreeMap<String, String>) -> Result<(), ManifestError> {
        let io = |path: &Path, source: std::io::Error| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io(parent, e))?;
        }

        let mut json = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut json, formatter);
        entries
            .serialize(&mut serializer)
            .map_err(|e| ManifestError::Parse {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        json.push(b'\n');

        let tmp = temp_path(&self.path);
        std::fs::write(&tmp, &json).map_err(|e| io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            io(&self.path, e)
        })
    }
}

impl Manifest for JsonManifest {
    fn clear(&mut self) {
        self.cleared = true;
        self.entries.clear();
    }

    fn add(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn flush(&mut self) -> Result<(), ManifestError> {
        let added = std::mem::take(&mut self.entries);
        let merged = if self.cleared {
            added
        } else {
            let mut stored = self.load()?;
            stored.extend(added);
            stored
        };
        self.write_atomic(&merged)?;
        tracing::info!(
            path = %self.path.display(),
            entries = merged.len(),
            replaced = self.cleared,
            "wrote manifest"
        );
        self.cleared = false;
        self.lookup.invalidate();
        Ok(())
    }

    fn get(&self, key: &str) -> Result<String, ManifestError> {
        self.lookup.get(&self.path, key)
    }
}

/// Reads a manifest file into a sorted map.
pub(crate) fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ManifestError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Sibling temporary file used for atomic replacement.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest_in(dir: &tempfile::TempDir) -> JsonManifest {
        JsonManifest::new(dir.path().join("staticmanifest.json"))
    }

    #[test]
    fn flush_without_clear_merges_with_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("staticmanifest.json"),
            r#"{"a.js": "/static/a.abc123.js"}"#,
        )
        .unwrap();

        let mut m = manifest_in(&dir);
        m.add("b.js", "/static/b.def456.js");
        m.flush().unwrap();

        let stored = m.load().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored["a.js"], "/static/a.abc123.js");
        assert_eq!(stored["b.js"], "/static/b.def456.js");
    }

    #[test]
    fn new_entries_win_on_merge() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = manifest_in(&dir);
        m.add("a.js", "/static/a.1.js");
        m.flush().unwrap();
        m.add("a.js", "/static/a.2.js");
        m.flush().unwrap();
        assert_eq!(m.load().unwrap()["a.js"], "/static/a.2.js");
    }

    #[test]
    fn flush_after_clear_replaces_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = manifest_in(&dir);
        m.add("old.js", "/static/old.js");
        m.flush().unwrap();

        m.clear();
        m.add("new.js", "/static/new.js");
        m.flush().unwrap();

        let stored = m.load().unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored.contains_key("new.js"));
    }

    #[test]
    fn flush_resets_working_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = manifest_in(&dir);
        m.clear();
        m.add("a.js", "/a");
        m.flush().unwrap();
        assert_eq!(m.pending_len(), 0);

        // The clear applied to one flush only.
        m.add("b.js", "/b");
        m.flush().unwrap();
        assert_eq!(m.load().unwrap().len(), 2);
    }

    #[test]
    fn output_is_sorted_and_indented() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = manifest_in(&dir);
        m.add("z.js", "/static/z.js");
        m.add("a.css", "/static/a.css");
        m.flush().unwrap();

        let written = std::fs::read_to_string(m.path()).unwrap();
        assert_eq!(
            written,
            "{\n    \"a.css\": \"/static/a.css\",\n    \"z.js\": \"/static/z.js\"\n}\n"
        );
        assert!(!temp_path(m.path()).exists());
    }

    #[test]
    fn flush_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = JsonManifest::new(dir.path().join("build/meta/manifest.json"));
        m.add("a.js", "/a");
        m.flush().unwrap();
        assert!(m.path().exists());
    }

    #[test]
    fn get_reads_flushed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = manifest_in(&dir);
        m.add("a.js", "/static/a.1.js");
        m.flush().unwrap();
        assert_eq!(m.get("a.js").unwrap(), "/static/a.1.js");

        m.add("a.js", "/static/a.2.js");
        m.flush().unwrap();
        assert_eq!(m.get("a.js").unwrap(), "/static/a.2.js");
    }

    #[test]
    fn get_missing_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = manifest_in(&dir);
        m.add("a.js", "/a");
        m.flush().unwrap();
        let err = m.get("missing.js").unwrap_err();
        assert!(matches!(err, ManifestError::NotInManifest { .. }));
    }

    #[test]
    fn corrupt_manifest_fails_to_merge() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("staticmanifest.json"), "not json {{{").unwrap();
        let mut m = manifest_in(&dir);
        m.add("a.js", "/a");
        let err = m.flush().unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn open_manifest_selects_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        assert!(open_manifest("json", &path).is_ok());

        let err = open_manifest("memcached", &path).err().unwrap();
        assert!(matches!(err, ManifestError::Config { .. }));
        let err = open_manifest("json", Path::new("")).err().unwrap();
        assert!(matches!(err, ManifestError::Config { .. }));
    }
}
