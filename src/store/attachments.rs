//! Attachment Manager.
//!
//! Uploaded images live in one flat directory, named by the file name the
//! uploader supplied. Two uploads with the same name share one blob; the later
//! one wins.

use super::{ensure_directory_exists, write_atomic};
use crate::errors::{AppResult, StoreError};
use crate::journal_core::validate_name_component;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Flat directory of uploaded attachments.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    dir: PathBuf,
}

impl AttachmentStore {
    /// Uses `dir` as the attachment directory. Nothing is created until the
    /// first `store`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        AttachmentStore { dir: dir.into() }
    }

    /// The attachment directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` under the final component of `filename` and returns the
    /// stored path.
    ///
    /// # Errors
    ///
    /// - `AppError::Validation` if the name is unusable as a file name
    /// - `AppError::Io` if the directory or file cannot be written
    pub fn store(&self, filename: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        let name = stored_name(filename);
        validate_name_component("Attachment name", name)?;

        ensure_directory_exists(&self.dir)?;
        let path = self.dir.join(name);
        write_atomic(&path, bytes)?;

        info!("Stored attachment ({} bytes)", bytes.len());
        Ok(path)
    }

    /// Returns the path of a stored attachment, or `None` if there is none.
    ///
    /// Unusable names never resolve.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        let name = stored_name(filename);
        if validate_name_component("Attachment name", name).is_err() {
            return None;
        }

        let path = self.dir.join(name);
        if path.is_file() {
            Some(path)
        } else {
            debug!("Attachment not found");
            None
        }
    }

    /// Reads a stored attachment.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingFile` if no attachment has this name.
    pub fn load(&self, filename: &str) -> AppResult<Vec<u8>> {
        let missing = || StoreError::MissingFile {
            path: self.dir.join(stored_name(filename)),
        };

        let path = self.resolve(filename).ok_or_else(missing)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(missing().into()),
            Err(e) => Err(e.into()),
        }
    }
}

// Uploaders may send a full client-side path; only the last segment is kept.
fn stored_name(filename: &str) -> &str {
    filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use tempfile::tempdir;

    #[test]
    fn test_store_and_resolve() {
        let temp_dir = tempdir().unwrap();
        let store = AttachmentStore::new(temp_dir.path().join("uploads"));
        let bytes = b"\x89PNG\r\n\x1a\nnot really a cat".to_vec();

        let stored = store.store("cat.png", &bytes).unwrap();
        let resolved = store.resolve("cat.png").unwrap();

        assert_eq!(stored, resolved);
        assert_eq!(fs::read(&resolved).unwrap(), bytes);
        assert_eq!(store.load("cat.png").unwrap(), bytes);
        assert!(store.resolve("missing.png").is_none());
    }

    #[test]
    fn test_same_name_overwrites() {
        let temp_dir = tempdir().unwrap();
        let store = AttachmentStore::new(temp_dir.path().join("uploads"));

        store.store("cat.png", b"first").unwrap();
        store.store("cat.png", b"second").unwrap();

        assert_eq!(store.load("cat.png").unwrap(), b"second");
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 1);
    }

    #[test]
    fn test_directory_is_created_idempotently() {
        let temp_dir = tempdir().unwrap();
        let store = AttachmentStore::new(temp_dir.path().join("nested").join("uploads"));
        assert!(!store.dir().exists());

        store.store("a.png", b"a").unwrap();
        store.store("b.png", b"b").unwrap();

        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_client_path_is_reduced_to_file_name() {
        let temp_dir = tempdir().unwrap();
        let store = AttachmentStore::new(temp_dir.path().join("uploads"));

        let stored = store.store("C:\\fakepath\\dog.jpg", b"woof").unwrap();
        assert_eq!(stored, store.dir().join("dog.jpg"));

        let stored = store.store("../../escape.jpg", b"nope").unwrap();
        assert_eq!(stored, store.dir().join("escape.jpg"));
        assert!(!temp_dir.path().join("escape.jpg").exists());
    }

    #[test]
    fn test_unusable_names_are_rejected() {
        let temp_dir = tempdir().unwrap();
        let store = AttachmentStore::new(temp_dir.path().join("uploads"));

        for name in ["", "   ", "..", "uploads/", ".hidden"] {
            assert!(
                matches!(store.store(name, b"x"), Err(AppError::Validation(_))),
                "expected {:?} to be rejected",
                name
            );
            assert!(store.resolve(name).is_none());
        }
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempdir().unwrap();
        let store = AttachmentStore::new(temp_dir.path().join("uploads"));

        match store.load("missing.png") {
            Err(AppError::Store(StoreError::MissingFile { path })) => {
                assert!(path.ends_with("missing.png"))
            }
            other => panic!("Expected MissingFile, got {:?}", other),
        }
    }
}
