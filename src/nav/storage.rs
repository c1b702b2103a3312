//! Durable client storage (the `localStorage` equivalent).

use anyhow::{Context, Result};
use log::{debug, info};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// String key/value store that outlives a page load
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    unavailable: Rc<RefCell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.entries.borrow_mut().insert(key.to_string(), value.to_string());
        storage
    }

    /// Simulate storage being blocked (private mode, quota exceeded)
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.borrow_mut() = unavailable;
    }

    fn check_available(&self) -> Result<()> {
        if *self.unavailable.borrow() {
            anyhow::bail!("Storage is unavailable");
        }
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_available()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// JSON file backed storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the platform data directory
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .context("Failed to get data directory")?
            .join("pageflow");
        Ok(data_dir.join("storage.json"))
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read storage file: {:?}", self.path))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse storage file: {:?}", self.path))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create storage directory: {:?}", dir))?;
                info!("Created storage directory: {:?}", dir);
            }
        }

        let content =
            serde_json::to_string_pretty(entries).context("Failed to serialize storage")?;

        // Write next to the target and rename so readers never see a torn file
        let tmp = self
            .path
            .with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write storage file: {:?}", tmp))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace storage file: {:?}", self.path))?;

        debug!("Saved {} storage entries to {:?}", entries.len(), self.path);
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("pageflow-test-{}", uuid::Uuid::new_v4()))
            .join("storage.json")
    }

    #[test]
    fn test_memory_storage_shared_between_clones() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set("page-section", "blog").unwrap();
        assert_eq!(other.get("page-section").unwrap().as_deref(), Some("blog"));

        other.remove("page-section").unwrap();
        assert_eq!(storage.get("page-section").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_unavailable() {
        let storage = MemoryStorage::with_entry("page-section", "home");
        storage.set_unavailable(true);
        assert!(storage.get("page-section").is_err());
        assert!(storage.set("page-section", "blog").is_err());

        storage.set_unavailable(false);
        assert_eq!(storage.get("page-section").unwrap().as_deref(), Some("home"));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let path = temp_path();
        let storage = FileStorage::new(&path);
        assert_eq!(storage.get("page-section").unwrap(), None);

        storage.set("page-section", "contact").unwrap();
        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("page-section").unwrap().as_deref(), Some("contact"));

        reopened.remove("page-section").unwrap();
        assert_eq!(storage.get("page-section").unwrap(), None);

        if let Some(dir) = path.parent() {
            fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.get("page-section").is_err());

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
