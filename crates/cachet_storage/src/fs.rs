//! Local filesystem storage backend.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::StorageError;
use crate::storage::{name_components, Storage};

/// A [`Storage`] backed by a directory on the local filesystem.
///
/// Each logical name maps to `<root>/<name>`. Parent directories are
/// created on save.
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    root: PathBuf,
}

impl FileSystemStorage {
    /// Creates a storage rooted at `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the filesystem path for a logical name.
    pub fn path(&self, name: &str) -> Result<PathBuf, StorageError> {
        let mut path = self.root.clone();
        for component in name_components(name)? {
            path.push(component);
        }
        Ok(path)
    }

    fn walk(&self, dir: &Path, prefix: &str, names: &mut Vec<String>) -> Result<(), StorageError> {
        let entries = std::fs::read_dir(dir).map_err(|e| StorageError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
                continue;
            };
            let name = if prefix.is_empty() {
                file_name.to_string()
            } else {
                format!("{prefix}/{file_name}")
            };
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| StorageError::Io {
                path: path.clone(),
                source: e,
            })?;
            if file_type.is_dir() {
                self.walk(&path, &name, names)?;
            } else if file_type.is_symlink() && path.is_dir() {
                tracing::debug!(path = %path.display(), "not following directory symlink");
            } else {
                names.push(name);
            }
        }
        Ok(())
    }
}

impl Storage for FileSystemStorage {
    fn exists(&self, name: &str) -> bool {
        self.path(name).map(|p| p.is_file()).unwrap_or(false)
    }

    fn open(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path(name)?;
        std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound {
                name: name.to_string(),
            },
            _ => StorageError::Io { path, source: e },
        })
    }

    fn save(&mut self, name: &str, content: &[u8]) -> Result<String, StorageError> {
        let path = self.path(name)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(&path, content).map_err(|e| StorageError::Io { path, source: e })?;
        Ok(name.to_string())
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        let path = self.path(name)?;
        std::fs::remove_file(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound {
                name: name.to_string(),
            },
            _ => StorageError::Io { path, source: e },
        })
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        if self.root.is_dir() {
            self.walk(&self.root, "", &mut names)?;
        }
        names.sort();
        Ok(names)
    }

    fn modified_time(&self, name: &str) -> Result<SystemTime, StorageError> {
        let path = self.path(name)?;
        std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| StorageError::Io { path, source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_storage() -> (tempfile::TempDir, FileSystemStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSystemStorage::new(dir.path());
        (dir, storage)
    }

    #[test]
    fn save_creates_parent_directories() {
        let (dir, mut storage) = make_storage();
        let saved = storage.save("css/vendor/reset.css", b"*{margin:0}").unwrap();
        assert_eq!(saved, "css/vendor/reset.css");
        assert!(dir.path().join("css").join("vendor").join("reset.css").is_file());
    }

    #[test]
    fn open_returns_saved_bytes() {
        let (_dir, mut storage) = make_storage();
        storage.save("app.js", b"console.log(1)").unwrap();
        assert_eq!(storage.open("app.js").unwrap(), b"console.log(1)");
    }

    #[test]
    fn open_missing_is_not_found() {
        let (_dir, storage) = make_storage();
        assert!(matches!(
            storage.open("missing.css"),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn exists_only_for_files() {
        let (_dir, mut storage) = make_storage();
        storage.save("img/logo.png", b"png").unwrap();
        assert!(storage.exists("img/logo.png"));
        assert!(!storage.exists("img"));
        assert!(!storage.exists("../escape"));
    }

    #[test]
    fn delete_removes_file() {
        let (_dir, mut storage) = make_storage();
        storage.save("a.txt", b"a").unwrap();
        storage.delete("a.txt").unwrap();
        assert!(!storage.exists("a.txt"));
        assert!(matches!(
            storage.delete("a.txt"),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn list_is_recursive_and_sorted() {
        let (_dir, mut storage) = make_storage();
        storage.save("js/app.js", b"").unwrap();
        storage.save("css/app.css", b"").unwrap();
        storage.save("favicon.ico", b"").unwrap();
        assert_eq!(
            storage.list().unwrap(),
            vec!["css/app.css", "favicon.ico", "js/app.js"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn list_skips_directory_symlinks() {
        let (dir, mut storage) = make_storage();
        storage.save("css/app.css", b"").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("css/loop")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("css/app.css"),
            dir.path().join("alias.css"),
        )
        .unwrap();
        assert_eq!(storage.list().unwrap(), vec!["alias.css", "css/app.css"]);
    }

    #[test]
    fn list_of_missing_root_is_empty() {
        let storage = FileSystemStorage::new("/nonexistent/cachet/root");
        assert!(storage.list().unwrap().is_empty());
    }

    #[test]
    fn modified_time_is_reported() {
        let (_dir, mut storage) = make_storage();
        storage.save("a.txt", b"a").unwrap();
        assert!(storage.modified_time("a.txt").is_ok());
    }

    #[test]
    fn invalid_names_are_rejected() {
        let (_dir, mut storage) = make_storage();
        assert!(matches!(
            storage.save("../outside.txt", b"x"),
            Err(StorageError::InvalidName { .. })
        ));
    }
}
