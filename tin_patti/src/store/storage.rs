//! Storage backends for single persisted records.
//!
//! A backend holds one raw record (a JSON document). Writes are
//! compare-and-swap on the raw contents so that several writers sharing a
//! record never overwrite each other silently.

use fs2::FileExt;
use log::debug;
use std::{
    ffi::OsString,
    fs::{self, File, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use super::errors::{StoreError, StoreResult};

/// Trait for a single durable record
pub trait Storage: Send + Sync {
    /// Read the raw record, `None` if nothing is stored.
    fn read(&self) -> StoreResult<Option<String>>;

    /// Atomically replace the record with `next` if it still equals
    /// `current`. Returns `false`, writing nothing, when it changed.
    fn replace(&self, current: Option<&str>, next: &str) -> StoreResult<bool>;

    /// Delete the record. Deleting a missing record is not an error.
    fn remove(&self) -> StoreResult<()>;

    /// Unconditionally overwrite the record (last writer wins).
    fn overwrite(&self, next: &str) -> StoreResult<()> {
        loop {
            let current = self.read()?;
            if self.replace(current.as_deref(), next)? {
                return Ok(());
            }
        }
    }
}

/// Record kept in process memory.
///
/// Clones share the same record, which models several contexts pointed at
/// one durable key.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    record: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a raw record.
    #[must_use]
    pub fn with_record(raw: impl Into<String>) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> StoreResult<Option<String>> {
        let record = self.record.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(record.clone())
    }

    fn replace(&self, current: Option<&str>, next: &str) -> StoreResult<bool> {
        let mut record = self.record.lock().map_err(|_| StoreError::LockPoisoned)?;
        if record.as_deref() != current {
            return Ok(false);
        }
        *record = Some(next.to_string());
        Ok(true)
    }

    fn remove(&self) -> StoreResult<()> {
        let mut record = self.record.lock().map_err(|_| StoreError::LockPoisoned)?;
        *record = None;
        Ok(())
    }
}

/// Record kept in a file.
///
/// Writes go to a temporary sibling that is synced and renamed into place.
/// Compare-and-swap holds an exclusive advisory lock on a sidecar `.lock`
/// file, so separate processes sharing the path are serialized.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock_path: PathBuf,
    tmp_path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            lock_path: sibling(&path, ".lock"),
            tmp_path: sibling(&path, ".tmp"),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    // The lock lives on a separate file: the record itself is replaced by
    // rename, which would orphan a lock held on the old inode.
    fn with_lock<R>(&self, f: impl FnOnce() -> StoreResult<R>) -> StoreResult<R> {
        self.ensure_parent_dir()?;
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?;
        lock.lock_exclusive()?;
        let result = f();
        FileExt::unlock(&lock)?;
        result
    }

    fn read_unlocked(&self) -> StoreResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_unlocked(&self, contents: &str) -> StoreResult<()> {
        let mut tmp = File::create(&self.tmp_path)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.sync_all()?;
        fs::rename(&self.tmp_path, &self.path)?;
        debug!("Wrote {} bytes to {}", contents.len(), self.path.display());
        Ok(())
    }
}

impl Storage for FileStorage {
    fn read(&self) -> StoreResult<Option<String>> {
        self.read_unlocked()
    }

    fn replace(&self, current: Option<&str>, next: &str) -> StoreResult<bool> {
        self.with_lock(|| {
            if self.read_unlocked()?.as_deref() != current {
                return Ok(false);
            }
            self.write_unlocked(next)?;
            Ok(true)
        })
    }

    fn remove(&self) -> StoreResult<()> {
        self.with_lock(|| match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        })
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
