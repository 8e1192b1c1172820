//! Durable key-value storage
//!
//! [`StorageArea`] is the browser-`localStorage`-shaped contract the recent
//! searches store is written against: string keys, string values, no schema.
//! Two backends are provided:
//!
//! - [`FileStorage`]: one JSON object file on disk. Survives restarts and is
//!   shared by every process pointed at the same file.
//! - [`MemoryStorage`]: process-local, gone on exit. Used for tests and the
//!   `--ephemeral` mode.
//!
//! Neither backend caches: a read always observes the latest completed write.

use crate::error::{ResiftError, Result};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// A key/value storage backend
pub trait StorageArea: Send + Sync {
    /// Raw value stored under `key`, or `None` if the key was never written
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// All keys currently present, sorted
    fn keys(&self) -> Result<Vec<String>>;

    /// Delete every key
    fn clear(&self) -> Result<()>;
}

/// Shared handle to a storage backend
pub type SharedStorage = Arc<dyn StorageArea>;

/// In-memory storage backend
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStorage {
        Arc::new(Self::new())
    }
}

impl StorageArea for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.items.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }

    fn clear(&self) -> Result<()> {
        self.items.clear();
        Ok(())
    }
}

/// JSON-file storage backend
///
/// The file holds a single object mapping keys to raw string values. Every
/// operation goes back to disk; each write goes to its own temp file next to
/// the target and is renamed over it, so readers only ever see a complete
/// file. The in-process lock only serializes writers sharing one handle;
/// separate handles and processes race at whole-file granularity.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn shared(path: impl Into<PathBuf>) -> SharedStorage {
        Arc::new(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self, key: &str) -> Result<BTreeMap<String, String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(ResiftError::StorageRead {
                    key: key.to_string(),
                    source: e,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents)
            .map_err(|e| ResiftError::CorruptStorage(self.path.clone(), e.to_string()))
    }

    fn write_map(&self, key: &str, map: &BTreeMap<String, String>) -> Result<()> {
        let write_err = |source: std::io::Error| ResiftError::StorageWrite {
            key: key.to_string(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(write_err)?;

        let serialized = serde_json::to_string_pretty(map)?;
        // One temp file per write, in the target directory so persist is a rename
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(serialized.as_bytes()).map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    fn update<F>(&self, key: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.write_lock.lock();
        let mut map = self.read_map(key)?;
        mutate(&mut map);
        self.write_map(key, &map)
    }
}

impl StorageArea for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map(key)?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.update(key, |map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.update(key, |map| {
            map.remove(key);
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.read_map("*")?.into_keys().collect())
    }

    fn clear(&self) -> Result<()> {
        self.update("*", BTreeMap::clear)
    }
}
