//! JSON documents guarded by an advisory file lock.
//!
//! The bot process and the triggered commit check both mutate the same
//! documents. Every mutation goes through [`JsonDocument::update`], which
//! holds an exclusive lock on a sidecar `.lock` file for the whole
//! read-modify-write and then replaces the document atomically.

use std::fs::{File, OpenOptions};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fd_lock::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

use crate::atomic::{atomic_write_json, ensure_parent, read_json_optional};
use crate::error::{PersistenceError, Result};

/// A typed JSON document on disk.
///
/// A missing file reads as `T::default()`.
pub struct JsonDocument<T> {
    path: PathBuf,
    lock_path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonDocument<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            lock_path: self.lock_path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for JsonDocument<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonDocument").field("path", &self.path).finish()
    }
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Creates a handle for the document at `path`. Nothing is touched on disk
    /// until the first read or update.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut lock_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);
        Self {
            path,
            lock_path,
            _marker: PhantomData,
        }
    }

    /// Path of the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_lock_file(&self) -> Result<RwLock<File>> {
        ensure_parent(&self.lock_path)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.lock_path)
            .map_err(|source| PersistenceError::LockError {
                path: self.lock_path.clone(),
                source,
            })?;
        Ok(RwLock::new(file))
    }

    /// Reads the current value under a shared lock.
    pub fn load(&self) -> Result<T> {
        let lock = self.open_lock_file()?;
        let _guard = lock.read().map_err(|source| PersistenceError::LockError {
            path: self.lock_path.clone(),
            source,
        })?;
        Ok(read_json_optional(&self.path)?.unwrap_or_default())
    }

    /// Runs `f` against the current value under an exclusive lock and
    /// persists the result before the lock is released.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut lock = self.open_lock_file()?;
        let _guard = lock.write().map_err(|source| PersistenceError::LockError {
            path: self.lock_path.clone(),
            source,
        })?;

        let mut value: T = read_json_optional(&self.path)?.unwrap_or_default();
        let result = f(&mut value);
        atomic_write_json(&self.path, &value)?;
        trace!(path = %self.path.display(), "document updated");

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Tally {
        count: u32,
    }

    #[test]
    fn test_missing_document_loads_default() {
        let dir = tempdir().unwrap();
        let doc: JsonDocument<Tally> = JsonDocument::new(dir.path().join("tally.json"));

        assert_eq!(doc.load().unwrap(), Tally::default());
        assert!(!doc.path().exists());
    }

    #[test]
    fn test_update_persists_and_returns_closure_result() {
        let dir = tempdir().unwrap();
        let doc: JsonDocument<Tally> = JsonDocument::new(dir.path().join("tally.json"));

        let after = doc
            .update(|t| {
                t.count += 2;
                t.count
            })
            .unwrap();

        assert_eq!(after, 2);
        assert_eq!(doc.load().unwrap().count, 2);
        assert!(dir.path().join("tally.json.lock").exists());
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let dir = tempdir().unwrap();
        let doc: Arc<JsonDocument<Tally>> =
            Arc::new(JsonDocument::new(dir.path().join("tally.json")));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let doc = Arc::clone(&doc);
                thread::spawn(move || {
                    for _ in 0..10 {
                        doc.update(|t| t.count += 1).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(doc.load().unwrap().count, 80);
    }
}
