use marquee_config::is_valid_slot_name;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error on slot '{slot}': {source}")]
    Io {
        slot: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage quota exceeded writing slot '{slot}': {size} bytes over a {quota} byte limit")]
    QuotaExceeded { slot: String, size: usize, quota: usize },

    #[error("invalid storage slot name '{0}'")]
    InvalidSlot(String),
}

/// Named-slot string store backing the watchlist.
///
/// Mirrors a browser-local key-value store: each slot holds one opaque string
/// and a write replaces the previous value wholesale.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, slot: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, slot: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, slot: &str) -> Result<(), StorageError>;
}

fn check_slot(slot: &str) -> Result<(), StorageError> {
    if is_valid_slot_name(slot) {
        Ok(())
    } else {
        Err(StorageError::InvalidSlot(slot.to_string()))
    }
}

/// One JSON file per slot under a directory
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slot))
    }

    fn io_error(slot: &str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
        move |source| StorageError::Io { slot: slot.to_string(), source }
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, slot: &str) -> Result<Option<String>, StorageError> {
        check_slot(slot)?;
        let path = self.slot_path(slot);
        if !path.exists() {
            debug!("Storage miss: {} (file does not exist)", slot);
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(Self::io_error(slot))?;
        debug!("Storage hit: {} ({} bytes)", slot, content.len());
        Ok(Some(content))
    }

    fn set(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        check_slot(slot)?;
        std::fs::create_dir_all(&self.dir).map_err(Self::io_error(slot))?;

        // Atomic write: write to temp file, then rename
        let path = self.slot_path(slot);
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value).map_err(Self::io_error(slot))?;
        std::fs::rename(&temp_path, &path).map_err(Self::io_error(slot))?;
        debug!("Storage write: {} ({} bytes)", slot, value.len());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<(), StorageError> {
        check_slot(slot)?;
        let path = self.slot_path(slot);
        if path.exists() {
            std::fs::remove_file(&path).map_err(Self::io_error(slot))?;
        }
        Ok(())
    }
}

/// In-process storage with an optional per-value size quota
#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any write whose value is larger than `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Seed a slot without going through quota checks
    pub fn insert_raw(&self, slot: &str, value: &str) {
        self.lock().insert(slot.to_string(), value.to_string());
    }

    pub fn raw(&self, slot: &str) -> Option<String> {
        self.lock().get(slot).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, slot: &str) -> Result<Option<String>, StorageError> {
        check_slot(slot)?;
        Ok(self.lock().get(slot).cloned())
    }

    fn set(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        check_slot(slot)?;
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    slot: slot.to_string(),
                    size: value.len(),
                    quota,
                });
            }
        }
        self.lock().insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<(), StorageError> {
        check_slot(slot)?;
        self.lock().remove(slot);
        Ok(())
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for std::sync::Arc<S> {
    fn get(&self, slot: &str) -> Result<Option<String>, StorageError> {
        (**self).get(slot)
    }

    fn set(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(slot, value)
    }

    fn remove(&self, slot: &str) -> Result<(), StorageError> {
        (**self).remove(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("storage"));

        assert_eq!(storage.get("watchlist").unwrap(), None);
        storage.set("watchlist", "[1,2,3]").unwrap();
        assert_eq!(storage.get("watchlist").unwrap().as_deref(), Some("[1,2,3]"));
        assert!(storage.slot_path("watchlist").exists());
        assert!(!storage.slot_path("watchlist").with_extension("json.tmp").exists());

        storage.set("watchlist", "[]").unwrap();
        assert_eq!(storage.get("watchlist").unwrap().as_deref(), Some("[]"));

        storage.remove("watchlist").unwrap();
        assert_eq!(storage.get("watchlist").unwrap(), None);
        // Removing an absent slot is fine
        storage.remove("watchlist").unwrap();
    }

    #[test]
    fn test_rejects_path_like_slot_names() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(storage.set("../escape", "x"), Err(StorageError::InvalidSlot(_))));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidSlot(_))));

        let memory = MemoryStorage::new();
        assert!(matches!(memory.set("a/b", "x"), Err(StorageError::InvalidSlot(_))));
    }

    #[test]
    fn test_memory_quota() {
        let storage = MemoryStorage::with_quota(4);
        storage.set("slot", "1234").unwrap();
        let err = storage.set("slot", "12345").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { size: 5, quota: 4, .. }));
        // Previous value survives the rejected write
        assert_eq!(storage.raw("slot").as_deref(), Some("1234"));
    }
}
