//! Persistent key-value backends for session state
//!
//! The token store only ever talks to [`KeyValueStore`], so the backend can be
//! an on-disk file for the CLI or an in-memory map for tests.

use base64::Engine;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, RwLock};
use tracing::warn;

use crate::error::{DeskError, Result};

/// String key-value store with synchronous access
pub trait KeyValueStore: Debug + Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Write several entries; readers see either none or all of them
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| DeskError::storage_read("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value.to_string())])
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.remove_many(&[key])
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| DeskError::storage_write("memory store lock poisoned"))?;
        for (key, value) in entries {
            map.insert(key.to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| DeskError::storage_write("memory store lock poisoned"))?;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// File store configuration
#[derive(Debug, Clone, Default)]
pub struct FileStoreConfig {
    pub path: PathBuf,
    pub encryption_key: Option<String>,
}

/// JSON map persisted to a single file, written through on every change
///
/// An unreadable or undecodable file opens as an empty store. The file is
/// replaced by the next write, including a removal of absent keys.
#[derive(Debug)]
pub struct FileStore {
    config: FileStoreConfig,
    entries: Mutex<BTreeMap<String, String>>,
    stale: AtomicBool,
}

impl FileStore {
    pub fn open(config: FileStoreConfig) -> Self {
        let (entries, stale) = match load_entries(&config) {
            Ok(entries) => (entries, false),
            Err(e) => {
                warn!(
                    path = %config.path.display(),
                    error = %e,
                    "ignoring unreadable session storage"
                );
                (BTreeMap::new(), true)
            }
        };
        Self {
            config,
            entries: Mutex::new(entries),
            stale: AtomicBool::new(stale),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| DeskError::storage_write("file store lock poisoned"))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.config.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| DeskError::storage_io("Failed to create storage directory", e))?;
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| DeskError::serialization(format!("Failed to serialize store: {}", e)))?;

        let final_content = match &self.config.encryption_key {
            Some(key) => obfuscate(&content, key),
            None => content,
        };

        fs::write(&self.config.path, final_content)
            .map_err(|e| DeskError::storage_io("Failed to write session storage", e))?;
        self.stale.store(false, Ordering::Release);
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| DeskError::storage_read("file store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value.to_string())])
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.remove_many(&[key])
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut map = self.lock()?;
        let mut next = map.clone();
        for (key, value) in entries {
            next.insert(key.to_string(), value.clone());
        }
        self.save(&next)?;
        *map = next;
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut map = self.lock()?;
        if keys.iter().all(|key| !map.contains_key(*key)) && !self.stale.load(Ordering::Acquire) {
            return Ok(());
        }
        let mut next = map.clone();
        for key in keys {
            next.remove(*key);
        }
        self.save(&next)?;
        *map = next;
        Ok(())
    }
}

fn load_entries(config: &FileStoreConfig) -> Result<BTreeMap<String, String>> {
    if !config.path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = fs::read_to_string(&config.path).map_err(|e| {
        DeskError::storage_read(format!("Failed to read session storage: {}", e))
    })?;

    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let plain = match &config.encryption_key {
        Some(key) => deobfuscate(&content, key)?,
        None => content,
    };

    serde_json::from_str(&plain)
        .map_err(|e| DeskError::storage_corrupt(format!("Failed to parse session storage: {}", e)))
}

fn xor_with_key(bytes: &[u8], key: &[u8]) -> Vec<u8> {
    if key.is_empty() {
        return bytes.to_vec();
    }
    bytes
        .iter()
        .zip(key.iter().cycle())
        .map(|(byte, key_byte)| byte ^ key_byte)
        .collect()
}

fn obfuscate(content: &str, key: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(xor_with_key(content.as_bytes(), key.as_bytes()))
}

fn deobfuscate(content: &str, key: &str) -> Result<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(content.trim())
        .map_err(|e| DeskError::storage_corrupt(format!("Failed to decode session storage: {}", e)))?;

    String::from_utf8(xor_with_key(&bytes, key.as_bytes()))
        .map_err(|e| DeskError::storage_corrupt(format!("Failed to decode session storage: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_crud() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);

        // removing an absent key is fine
        store.remove("a").unwrap();
    }

    #[test]
    fn test_memory_store_set_many_overwrites() {
        let store = MemoryStore::new();
        store.set("a", "old").unwrap();
        store
            .set_many(&[("a", "new".to_string()), ("b", "2".to_string())])
            .unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("new"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let config = FileStoreConfig {
            path: dir.path().join("nested").join("session.json"),
            encryption_key: None,
        };

        let store = FileStore::open(config.clone());
        store
            .set_many(&[("authToken", "abc".to_string()), ("userId", "7".to_string())])
            .unwrap();
        drop(store);

        let reopened = FileStore::open(config);
        assert_eq!(reopened.get("authToken").unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get("userId").unwrap().as_deref(), Some("7"));
    }

    #[test]
    fn test_file_store_obfuscates_content() {
        let dir = tempdir().unwrap();
        let config = FileStoreConfig {
            path: dir.path().join("session.json"),
            encryption_key: Some("s3cret".to_string()),
        };

        let store = FileStore::open(config.clone());
        store.set("authToken", "plain-token-value").unwrap();

        let raw = fs::read_to_string(&config.path).unwrap();
        assert!(!raw.contains("plain-token-value"));

        let reopened = FileStore::open(config);
        assert_eq!(
            reopened.get("authToken").unwrap().as_deref(),
            Some("plain-token-value")
        );
    }

    #[test]
    fn test_file_store_empty_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "  \n").unwrap();

        let store = FileStore::open(FileStoreConfig {
            path,
            encryption_key: None,
        });
        assert_eq!(store.get("authToken").unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_file_opens_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(FileStoreConfig {
            path: path.clone(),
            encryption_key: None,
        });
        assert_eq!(store.get("authToken").unwrap(), None);

        // clearing absent keys still replaces the bad file
        store.remove_many(&["authToken", "username"]).unwrap();
        let rewritten: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(rewritten.is_empty());
    }

    #[test]
    fn test_file_store_changed_key_opens_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileStore::open(FileStoreConfig {
            path: path.clone(),
            encryption_key: Some("k1".to_string()),
        });
        store.set("authToken", "abc").unwrap();
        drop(store);

        let plain = FileStore::open(FileStoreConfig {
            path: path.clone(),
            encryption_key: None,
        });
        assert_eq!(plain.get("authToken").unwrap(), None);

        plain.set("authToken", "def").unwrap();
        let reopened = FileStore::open(FileStoreConfig {
            path,
            encryption_key: None,
        });
        assert_eq!(reopened.get("authToken").unwrap().as_deref(), Some("def"));
    }

    #[test]
    fn test_file_store_remove_absent_keys_skips_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileStore::open(FileStoreConfig {
            path: path.clone(),
            encryption_key: None,
        });

        store.remove_many(&["authToken", "username"]).unwrap();
        assert!(!path.exists());
    }
}
