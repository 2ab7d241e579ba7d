//! Key-Value Storage Backends
//!
//! Persistent string-to-string stores the session is written into.
//! `FileStorage` keeps every key in one JSON object file and rewrites it
//! through a temp file, so a batch of writes lands together or not at all.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Errors raised by a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored file could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A single write in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    Set { key: String, value: String },
    Remove { key: String },
}

impl StorageOp {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        StorageOp::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        StorageOp::Remove { key: key.into() }
    }

    fn apply_to(&self, map: &mut BTreeMap<String, String>) {
        match self {
            StorageOp::Set { key, value } => {
                map.insert(key.clone(), value.clone());
            }
            StorageOp::Remove { key } => {
                map.remove(key);
            }
        }
    }
}

/// Client-local persistent key-value store
pub trait StorageBackend: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Apply a batch of writes. Backends that can should make the batch atomic.
    fn apply(&self, ops: &[StorageOp]) -> StorageResult<()>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.apply(&[StorageOp::set(key, value)])
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.apply(&[StorageOp::remove(key)])
    }
}

/// In-process backend, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored entries
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn apply(&self, ops: &[StorageOp]) -> StorageResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        for op in ops {
            op.apply_to(&mut *entries);
        }
        Ok(())
    }
}

/// JSON-file backend
///
/// The file holds a single flat object. An in-memory copy serves reads and is
/// replaced only after the file has been renamed into place.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    cache: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the store at `path`
    ///
    /// A file that is not a JSON object of strings is treated as empty and
    /// overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        let cache = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, String>>(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = ?path, error = %e, "Ignoring unreadable storage file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = ?path, keys = cache.len(), "Opened storage file");

        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, map: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        let mut file = Self::create_private(&tmp)?;
        file.write_all(&serde_json::to_vec_pretty(map)?)?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// The file holds a bearer token: owner read/write only
    fn create_private(path: &Path) -> StorageResult<File> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        Ok(options.open(path)?)
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let cache = self
            .cache
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(cache.get(key).cloned())
    }

    fn apply(&self, ops: &[StorageOp]) -> StorageResult<()> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        let mut next = cache.clone();
        for op in ops {
            op.apply_to(&mut next);
        }
        if next == *cache {
            return Ok(());
        }

        self.write_file(&next)?;
        *cache = next;
        Ok(())
    }
}
