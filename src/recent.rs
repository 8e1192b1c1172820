//! Persistent recent-searches list
//!
//! Each storage key holds one list of query strings, newest first, with no
//! duplicates. The list is stored as a JSON array of strings. There is no
//! in-memory copy: every operation is a full read-modify-write against the
//! backing [`StorageArea`](crate::storage::StorageArea), so concurrent writers
//! to the same key race at whole-list granularity (last writer wins).

use crate::error::Result;
use crate::logging;
use crate::storage::SharedStorage;

/// Recent searches lists kept in a shared storage backend
#[derive(Clone)]
pub struct RecentSearches {
    storage: SharedStorage,
}

impl std::fmt::Debug for RecentSearches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentSearches").finish_non_exhaustive()
    }
}

impl RecentSearches {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    /// The list stored under `key`, newest first.
    ///
    /// A key that was never written, or whose value is not a JSON array of
    /// strings, reads as an empty list. Only backend failures are errors.
    pub fn get(&self, key: &str) -> Result<Vec<String>> {
        let raw = self.storage.get_item(key)?;
        Ok(decode_list(key, raw.as_deref()))
    }

    /// Move `entry` to the front of the list, inserting it if absent.
    ///
    /// An empty `entry` is never stored; the list is rewritten unchanged.
    pub fn upsert(&self, key: &str, entry: &str) -> Result<()> {
        self.remove(key, entry)?;

        let mut items = self.get(key)?;
        if !entry.is_empty() {
            items.insert(0, entry.to_string());
        }

        self.write(key, &items)?;
        logging::log_store_write("upsert", key, entry, items.len());
        Ok(())
    }

    /// Remove every occurrence of `entry` (exact match). Removing an entry
    /// that is not present still rewrites the list.
    pub fn remove(&self, key: &str, entry: &str) -> Result<()> {
        let mut items = self.get(key)?;
        items.retain(|item| item != entry);

        self.write(key, &items)?;
        logging::log_store_write("remove", key, entry, items.len());
        Ok(())
    }

    fn write(&self, key: &str, items: &[String]) -> Result<()> {
        let raw = encode_list(items)?;
        self.storage.set_item(key, &raw)
    }
}

/// Serialize a list for storage
pub fn encode_list(items: &[String]) -> Result<String> {
    Ok(serde_json::to_string(items)?)
}

/// Parse a stored value, degrading anything unusable to an empty list
pub fn decode_list(key: &str, raw: Option<&str>) -> Vec<String> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Vec::new(),
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(items) => items,
        Err(e) => {
            logging::log_malformed_value(key, &e.to_string());
            Vec::new()
        }
    }
}
