//! Flat-file storage for credentials, journal entries, images and reflections.
//!
//! Tables are CSV files with a fixed header row. A table is read whole on
//! every query and rewritten whole on every mutation; `TableFile::transaction`
//! is the single-writer boundary that makes that safe. It serializes writers
//! with an in-process mutex and an advisory lock on a sidecar `.lock` file,
//! and replaces the table through a same-directory temporary file and an
//! atomic rename, so readers never observe a half-written table.
//!
//! # Module Structure
//!
//! - `users`: Credential Store
//! - `entries`: Entry Store
//! - `attachments`: Attachment Manager
//! - `reflections`: weekly reflection notes
//!
//! # Example
//!
//! ```no_run
//! use gratitude::store::entries::EntryStore;
//! use gratitude::Config;
//!
//! let config = Config::load()?;
//! let entries = EntryStore::new(&config.entries_file);
//! for entry in entries.list_by_user("ana")? {
//!     println!("{} {}", entry.date, entry.mood);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod attachments;
pub mod entries;
pub mod reflections;
pub mod users;

use crate::constants;
use crate::errors::{AppError, AppResult, LockError, StoreError};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// A CSV table of `R` rows stored in a single file.
pub struct TableFile<R> {
    path: PathBuf,
    header: &'static [&'static str],
    write_guard: Mutex<()>,
    _rows: PhantomData<fn() -> R>,
}

impl<R> TableFile<R>
where
    R: Serialize + DeserializeOwned,
{
    /// Binds a table to its file and expected header. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>, header: &'static [&'static str]) -> Self {
        TableFile {
            path: path.into(),
            header,
            write_guard: Mutex::new(()),
            _rows: PhantomData,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every row in file order, creating an empty table on first use.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::SchemaMismatch` when the header on disk differs from
    /// the expected one, or a CSV/I/O error when the file cannot be read.
    pub fn load(&self) -> AppResult<Vec<R>> {
        if !self.path.exists() {
            self.initialize()?;
        }
        self.read_rows()
    }

    /// Runs `mutate` against the current rows under the write lock and persists
    /// the result.
    ///
    /// The table is rewritten only when `mutate` returns `Ok`; an error leaves the
    /// file untouched and is passed through to the caller.
    pub fn transaction<T, F>(&self, mutate: F) -> AppResult<T>
    where
        F: FnOnce(&mut Vec<R>) -> AppResult<T>,
    {
        let _guard = self
            .write_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let _lock = self.acquire_file_lock()?;

        self.create_if_missing()?;
        let mut rows = self.read_rows()?;
        let outcome = mutate(&mut rows)?;
        self.write_rows(&rows)?;

        debug!(
            "Rewrote table {:?} with {} rows",
            self.path.file_name(),
            rows.len()
        );
        Ok(outcome)
    }

    fn initialize(&self) -> AppResult<()> {
        let _guard = self
            .write_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let _lock = self.acquire_file_lock()?;
        self.create_if_missing()
    }

    // Callers must hold the write lock.
    fn create_if_missing(&self) -> AppResult<()> {
        if self.path.exists() {
            return Ok(());
        }
        debug!("Initializing empty table {:?}", self.path.file_name());
        self.write_rows(&[])
    }

    fn read_rows(&self) -> AppResult<Vec<R>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let found = reader.headers()?;
        if found.iter().ne(self.header.iter().copied()) {
            return Err(StoreError::SchemaMismatch {
                path: self.path.clone(),
                found: found.iter().collect::<Vec<_>>().join(","),
                expected: self.header.join(","),
            }
            .into());
        }

        let rows = reader.deserialize().collect::<Result<Vec<R>, _>>()?;
        Ok(rows)
    }

    fn write_rows(&self, rows: &[R]) -> AppResult<()> {
        replace_file(&self.path, |file| {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer.write_record(self.header)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
            Ok(())
        })
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".");
        name.push(constants::LOCK_FILE_EXTENSION);
        PathBuf::from(name)
    }

    fn acquire_file_lock(&self) -> AppResult<TableLock> {
        let lock_path = self.lock_path();
        if let Some(parent) = parent_dir(&lock_path) {
            ensure_directory_exists(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|source| LockError::AcquisitionFailed {
                path: lock_path.clone(),
                source,
            })?;

        let contended = fs2::lock_contended_error().raw_os_error();
        for attempt in 1..=constants::LOCK_RETRY_ATTEMPTS {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => return Ok(TableLock { file }),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock || e.raw_os_error() == contended => {
                    debug!("Table lock busy (attempt {})", attempt);
                    thread::sleep(Duration::from_millis(constants::LOCK_RETRY_INTERVAL_MS));
                }
                Err(source) => {
                    return Err(LockError::AcquisitionFailed {
                        path: lock_path,
                        source,
                    }
                    .into())
                }
            }
        }

        warn!("Gave up waiting for table lock on {:?}", self.path.file_name());
        Err(LockError::FileBusy {
            path: self.path.clone(),
        }
        .into())
    }
}

/// Holds the advisory lock until dropped.
struct TableLock {
    file: File,
}

impl Drop for TableLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to release table lock: {}", e);
        }
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Ensures a directory exists, creating it (and its parents) if necessary.
///
/// Newly created directories get owner-only permissions on Unix. Calling this on
/// an existing directory is a no-op.
///
/// # Errors
///
/// Returns `AppError::Io` if the directory creation fails due to permission issues,
/// invalid paths, or other filesystem errors.
pub fn ensure_directory_exists(dir: &Path) -> AppResult<()> {
    if dir.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|e| {
        AppError::Io(io::Error::new(
            e.kind(),
            format!("Failed to create directory {}: {}", dir.display(), e),
        ))
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = fs::Permissions::from_mode(constants::DEFAULT_DIR_PERMISSIONS);
        fs::set_permissions(dir, permissions)?;
    }

    debug!("Created directory {:?}", dir.file_name());
    Ok(())
}

/// Replaces `path` with whatever `write` produces, atomically.
///
/// The content is written to a temporary file in the same directory, synced,
/// and renamed over the destination, so a crash mid-write leaves the previous
/// version intact.
pub(crate) fn replace_file<F>(path: &Path, write: F) -> AppResult<()>
where
    F: FnOnce(&mut File) -> AppResult<()>,
{
    let dir = match parent_dir(path) {
        Some(parent) => {
            ensure_directory_exists(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    write(temp.as_file_mut())?;
    temp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(constants::DEFAULT_FILE_PERMISSIONS))?;
    }

    temp.persist(path).map_err(|e| AppError::Io(e.error))?;
    Ok(())
}

/// Writes `bytes` to `path`, replacing any previous content atomically.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> AppResult<()> {
    replace_file(path, |file| {
        file.write_all(bytes)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::Arc;
    use tempfile::tempdir;

    const HEADER: &[&str] = &["name", "count"];

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        name: String,
        count: u32,
    }

    fn row(name: &str, count: u32) -> Row {
        Row {
            name: name.to_string(),
            count,
        }
    }

    #[test]
    fn test_load_initializes_missing_table() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("table.csv");
        let table: TableFile<Row> = TableFile::new(&path, HEADER);

        assert!(!path.exists());
        let rows = table.load().unwrap();

        assert!(rows.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "name,count\n");
    }

    #[test]
    fn test_transaction_persists_rows_in_order() {
        let temp_dir = tempdir().unwrap();
        let table: TableFile<Row> = TableFile::new(temp_dir.path().join("table.csv"), HEADER);

        table
            .transaction(|rows| {
                rows.push(row("a", 1));
                rows.push(row("b, with comma", 2));
                Ok(())
            })
            .unwrap();

        let reloaded: TableFile<Row> = TableFile::new(table.path(), HEADER);
        assert_eq!(
            reloaded.load().unwrap(),
            vec![row("a", 1), row("b, with comma", 2)]
        );
    }

    #[test]
    fn test_failed_transaction_leaves_table_untouched() {
        let temp_dir = tempdir().unwrap();
        let table: TableFile<Row> = TableFile::new(temp_dir.path().join("table.csv"), HEADER);
        table
            .transaction(|rows| {
                rows.push(row("kept", 1));
                Ok(())
            })
            .unwrap();
        let before = fs::read_to_string(table.path()).unwrap();

        let result: AppResult<()> = table.transaction(|rows| {
            rows.clear();
            Err(AppError::Validation("nope".to_string()))
        });

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(fs::read_to_string(table.path()).unwrap(), before);
    }

    #[test]
    fn test_header_mismatch_is_reported() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("table.csv");
        fs::write(&path, "username,date,mood\nana,2024-01-01,Happy\n").unwrap();
        let table: TableFile<Row> = TableFile::new(&path, HEADER);

        match table.load() {
            Err(AppError::Store(StoreError::SchemaMismatch {
                found, expected, ..
            })) => {
                assert_eq!(found, "username,date,mood");
                assert_eq!(expected, "name,count");
            }
            other => panic!("Expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_concurrent_transactions_do_not_lose_writes() {
        let temp_dir = tempdir().unwrap();
        let table: Arc<TableFile<Row>> =
            Arc::new(TableFile::new(temp_dir.path().join("table.csv"), HEADER));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let table = Arc::clone(&table);
                thread::spawn(move || {
                    table
                        .transaction(|rows| {
                            rows.push(row(&format!("writer-{}", i), i));
                            Ok(())
                        })
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(table.load().unwrap().len(), 8);
    }

    #[test]
    fn test_write_atomic_overwrites() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("blob.bin");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[cfg(unix)]
    #[test]
    fn test_created_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().join("private");
        let path = dir.join("blob.bin");
        write_atomic(&path, b"secret").unwrap();

        let dir_mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        let file_mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
        assert_eq!(file_mode, 0o600);
    }
}
