use crate::storage::{FileStorage, KeyValueStorage};
use marquee_config::{Config, PathManager};
use marquee_models::{MediaKind, WatchlistEntry};
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

/// How the store came to hold its initial contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The slot held a valid entry list
    Loaded { entries: usize },
    /// The slot was absent; started empty
    Empty,
    /// The slot held data that could not be read or decoded; started empty
    Corrupt { reason: String },
}

/// Result of writing the entry list back to storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Saved { entries: usize },
    Failed { reason: String },
}

impl PersistOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, PersistOutcome::Saved { .. })
    }
}

/// The user's saved catalog items, in insertion order, backed by one storage slot.
///
/// Every mutation writes the full list back synchronously. Storage failures
/// never surface as errors: loads fall back to an empty list and failed writes
/// leave the in-memory list authoritative for the rest of the session. Another
/// process writing the same slot simply overwrites it (last writer wins).
pub struct WatchlistStore {
    entries: Vec<WatchlistEntry>,
    storage: Box<dyn KeyValueStorage>,
    slot: String,
    last_persist: Option<PersistOutcome>,
}

impl WatchlistStore {
    /// Read the slot and build a store from it
    pub fn load(storage: Box<dyn KeyValueStorage>, slot: impl Into<String>) -> (Self, LoadOutcome) {
        let slot = slot.into();
        let (entries, outcome) = match storage.get(&slot) {
            Ok(None) => {
                debug!("Watchlist slot '{}' is empty, starting with an empty watchlist", slot);
                (Vec::new(), LoadOutcome::Empty)
            }
            Ok(Some(raw)) if raw.trim().is_empty() => {
                debug!("Watchlist slot '{}' holds a blank value, starting with an empty watchlist", slot);
                (Vec::new(), LoadOutcome::Empty)
            }
            Ok(Some(raw)) => match serde_json::from_str::<Vec<WatchlistEntry>>(&raw) {
                Ok(entries) => {
                    let entries = dedup_by_identity(entries);
                    info!("Loaded watchlist: {} entries from slot '{}'", entries.len(), slot);
                    let count = entries.len();
                    (entries, LoadOutcome::Loaded { entries: count })
                }
                Err(e) => {
                    warn!(
                        "Watchlist data in slot '{}' is corrupt: {}. Starting with an empty watchlist.",
                        slot, e
                    );
                    (Vec::new(), LoadOutcome::Corrupt { reason: e.to_string() })
                }
            },
            Err(e) => {
                warn!("Failed to read watchlist slot '{}': {}. Starting with an empty watchlist.", slot, e);
                (Vec::new(), LoadOutcome::Corrupt { reason: e.to_string() })
            }
        };

        let store = Self {
            entries,
            storage,
            slot,
            last_persist: None,
        };
        (store, outcome)
    }

    /// Open the configured slot in the data directory's file storage
    pub fn open(path_manager: &PathManager, config: &Config) -> (Self, LoadOutcome) {
        let storage = FileStorage::new(path_manager.storage_dir());
        Self::load(Box::new(storage), config.watchlist.slot.clone())
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: u64, kind: MediaKind) -> bool {
        self.entries.iter().any(|e| e.matches(id, kind))
    }

    pub fn get(&self, id: u64, kind: MediaKind) -> Option<&WatchlistEntry> {
        self.entries.iter().find(|e| e.matches(id, kind))
    }

    /// Append `entry` unless its `(id, kind)` is already saved.
    ///
    /// Returns true when the entry was added.
    pub fn add(&mut self, entry: WatchlistEntry) -> bool {
        if self.contains(entry.id, entry.kind) {
            debug!("Watchlist already contains {} {}, skipping add", entry.kind, entry.id);
            return false;
        }
        debug!("Adding {} {} ('{}') to watchlist", entry.kind, entry.id, entry.title);
        self.entries.push(entry);
        self.persist();
        true
    }

    /// Remove the entry for `(id, kind)` if present. Returns true when one was removed.
    pub fn remove(&mut self, id: u64, kind: MediaKind) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| !e.matches(id, kind));
        if self.entries.len() == before {
            debug!("Watchlist does not contain {} {}, skipping remove", kind, id);
            return false;
        }
        debug!("Removed {} {} from watchlist", kind, id);
        self.persist();
        true
    }

    /// Remove the entry if saved, otherwise add it. Returns whether it is now saved.
    pub fn toggle(&mut self, entry: WatchlistEntry) -> bool {
        if self.remove(entry.id, entry.kind) {
            false
        } else {
            self.add(entry)
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Write the full entry list to the slot, overwriting the previous value
    pub fn persist(&mut self) -> PersistOutcome {
        let outcome = match serde_json::to_string(&self.entries) {
            Ok(json) => match self.storage.set(&self.slot, &json) {
                Ok(()) => {
                    debug!("Watchlist saved: {} entries to slot '{}'", self.entries.len(), self.slot);
                    PersistOutcome::Saved { entries: self.entries.len() }
                }
                Err(e) => {
                    error!("Failed to save watchlist to slot '{}': {}", self.slot, e);
                    PersistOutcome::Failed { reason: e.to_string() }
                }
            },
            Err(e) => {
                error!("Failed to serialize watchlist: {}", e);
                PersistOutcome::Failed { reason: e.to_string() }
            }
        };
        self.last_persist = Some(outcome.clone());
        outcome
    }

    /// Outcome of the most recent write, if any write happened this session
    pub fn last_persist(&self) -> Option<&PersistOutcome> {
        self.last_persist.as_ref()
    }
}

/// Keep the first occurrence of each `(id, kind)`, preserving order
fn dedup_by_identity(entries: Vec<WatchlistEntry>) -> Vec<WatchlistEntry> {
    let mut seen = HashSet::new();
    let before = entries.len();
    let deduped: Vec<_> = entries.into_iter().filter(|e| seen.insert(e.key())).collect();
    if deduped.len() < before {
        warn!("Dropped {} duplicate watchlist entries", before - deduped.len());
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    const SLOT: &str = "marquee-watchlist";

    fn entry(id: u64, kind: MediaKind, title: &str) -> WatchlistEntry {
        WatchlistEntry::new(id, kind, title, Some(format!("/{}.jpg", id)))
    }

    fn empty_store() -> (WatchlistStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let (store, outcome) = WatchlistStore::load(Box::new(storage.clone()), SLOT);
        assert_eq!(outcome, LoadOutcome::Empty);
        (store, storage)
    }

    #[test]
    fn test_add_contains_remove_scenario() {
        let (mut store, _) = empty_store();
        assert!(store.add(WatchlistEntry::new(1, MediaKind::Movie, "Inception", Some("/x.jpg".to_string()))));
        assert!(store.contains(1, MediaKind::Movie));
        assert!(!store.contains(1, MediaKind::Series));

        assert!(store.remove(1, MediaKind::Movie));
        assert!(!store.contains(1, MediaKind::Movie));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let (mut store, _) = empty_store();
        assert!(store.add(entry(7, MediaKind::Movie, "Seven")));
        assert!(!store.add(entry(7, MediaKind::Movie, "Seven (again)")));
        assert_eq!(store.len(), 1);
        // The first snapshot wins
        assert_eq!(store.get(7, MediaKind::Movie).unwrap().title, "Seven");
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (mut store, storage) = empty_store();
        store.add(entry(1, MediaKind::Movie, "A"));
        let before = storage.raw(SLOT);

        assert!(!store.remove(2, MediaKind::Movie));
        assert!(!store.remove(1, MediaKind::Series));
        assert_eq!(store.len(), 1);
        assert_eq!(storage.raw(SLOT), before);
    }

    #[test]
    fn test_same_id_different_kind_are_distinct() {
        let (mut store, _) = empty_store();
        store.add(entry(5, MediaKind::Movie, "Movie five"));
        store.add(entry(5, MediaKind::Series, "Series five"));
        assert_eq!(store.len(), 2);

        store.remove(5, MediaKind::Movie);
        assert!(store.contains(5, MediaKind::Series));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_removal_preserves_order() {
        let (mut store, _) = empty_store();
        store.add(entry(1, MediaKind::Movie, "A"));
        store.add(entry(2, MediaKind::Movie, "B"));
        store.add(entry(3, MediaKind::Series, "C"));
        store.remove(1, MediaKind::Movie);

        let ids: Vec<u64> = store.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_toggle() {
        let (mut store, _) = empty_store();
        assert!(store.toggle(entry(9, MediaKind::Series, "Nine")));
        assert!(store.contains(9, MediaKind::Series));
        assert!(!store.toggle(entry(9, MediaKind::Series, "Nine")));
        assert!(!store.contains(9, MediaKind::Series));
    }

    #[test]
    fn test_mutations_persist_and_reload() {
        let (mut store, storage) = empty_store();
        store.add(entry(1, MediaKind::Movie, "A"));
        store.add(entry(2, MediaKind::Series, "B"));
        store.add(WatchlistEntry::new(3, MediaKind::Movie, "C", None));
        assert_eq!(store.last_persist(), Some(&PersistOutcome::Saved { entries: 3 }));

        let (reloaded, outcome) = WatchlistStore::load(Box::new(storage.clone()), SLOT);
        assert_eq!(outcome, LoadOutcome::Loaded { entries: 3 });

        let original: HashSet<_> = store.entries().iter().map(|e| (e.key(), e.title.clone(), e.poster_path.clone())).collect();
        let loaded: HashSet<_> = reloaded.entries().iter().map(|e| (e.key(), e.title.clone(), e.poster_path.clone())).collect();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_persisted_layout() {
        let (mut store, storage) = empty_store();
        store.add(WatchlistEntry::new(1, MediaKind::Movie, "Inception", Some("/x.jpg".to_string())));
        store.add(WatchlistEntry::new(2, MediaKind::Series, "Dark", None));

        let value: serde_json::Value = serde_json::from_str(&storage.raw(SLOT).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"id": 1, "type": "movie", "title": "Inception", "poster_path": "/x.jpg"},
                {"id": 2, "type": "tv", "title": "Dark", "poster_path": null}
            ])
        );
    }

    #[test]
    fn test_corrupt_slot_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.insert_raw(SLOT, "not json at all");

        let (mut store, outcome) = WatchlistStore::load(Box::new(storage.clone()), SLOT);
        assert!(matches!(outcome, LoadOutcome::Corrupt { .. }));
        assert!(store.is_empty());

        // The next mutation overwrites the corrupt value
        store.add(entry(1, MediaKind::Movie, "A"));
        let (reloaded, outcome) = WatchlistStore::load(Box::new(storage), SLOT);
        assert_eq!(outcome, LoadOutcome::Loaded { entries: 1 });
        assert!(reloaded.contains(1, MediaKind::Movie));
    }

    #[test]
    fn test_blank_slot_loads_as_empty() {
        for raw in ["", "  \n"] {
            let storage = MemoryStorage::new();
            storage.insert_raw(SLOT, raw);
            let (store, outcome) = WatchlistStore::load(Box::new(storage), SLOT);
            assert_eq!(outcome, LoadOutcome::Empty);
            assert!(store.is_empty());
        }

        // `null` is not a list
        let storage = MemoryStorage::new();
        storage.insert_raw(SLOT, "null");
        let (_, outcome) = WatchlistStore::load(Box::new(storage), SLOT);
        assert!(matches!(outcome, LoadOutcome::Corrupt { .. }));
    }

    #[test]
    fn test_unreadable_slot_loads_empty() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        // A directory where the slot file should be makes the read fail
        std::fs::create_dir_all(storage.slot_path(SLOT)).unwrap();

        let (store, outcome) = WatchlistStore::load(Box::new(storage), SLOT);
        assert!(matches!(outcome, LoadOutcome::Corrupt { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_persist_then_load_returns_same_set() {
        let storage = Arc::new(MemoryStorage::new());
        storage.insert_raw(
            SLOT,
            r#"[{"id":27205,"type":"movie","title":"Inception","poster_path":"/i.jpg"},
                {"id":1396,"type":"tv","title":"Breaking Bad","poster_path":null},
                {"id":27205,"type":"tv","title":"Other","poster_path":null}]"#,
        );

        let (mut store, outcome) = WatchlistStore::load(Box::new(storage.clone()), SLOT);
        assert_eq!(outcome, LoadOutcome::Loaded { entries: 3 });
        assert_eq!(store.persist(), PersistOutcome::Saved { entries: 3 });

        let (reloaded, outcome) = WatchlistStore::load(Box::new(storage), SLOT);
        assert_eq!(outcome, LoadOutcome::Loaded { entries: 3 });
        let before: HashSet<_> = store.entries().iter().map(|e| e.key()).collect();
        let after: HashSet<_> = reloaded.entries().iter().map(|e| e.key()).collect();
        assert_eq!(before, after);
        assert_eq!(reloaded.entries(), store.entries());
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let storage = MemoryStorage::new();
        storage.insert_raw(SLOT, r#"{"id": 1}"#);
        let (_, outcome) = WatchlistStore::load(Box::new(storage), SLOT);
        assert!(matches!(outcome, LoadOutcome::Corrupt { .. }));
    }

    #[test]
    fn test_duplicates_in_slot_are_collapsed() {
        let storage = MemoryStorage::new();
        storage.insert_raw(
            SLOT,
            r#"[{"id":1,"type":"movie","title":"First","poster_path":null},
                {"id":1,"type":"movie","title":"Second","poster_path":null},
                {"id":1,"type":"tv","title":"Show","poster_path":null}]"#,
        );
        let (store, outcome) = WatchlistStore::load(Box::new(storage), SLOT);
        assert_eq!(outcome, LoadOutcome::Loaded { entries: 2 });
        assert_eq!(store.get(1, MediaKind::Movie).unwrap().title, "First");
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        // Room for an empty list but not for an entry
        let storage = Arc::new(MemoryStorage::with_quota(2));
        let (mut store, _) = WatchlistStore::load(Box::new(storage.clone()), SLOT);

        assert!(store.add(entry(1, MediaKind::Movie, "A")));
        assert!(store.contains(1, MediaKind::Movie));
        assert!(matches!(store.last_persist(), Some(PersistOutcome::Failed { .. })));
        assert_eq!(storage.raw(SLOT), None);

        store.clear();
        assert_eq!(store.last_persist(), Some(&PersistOutcome::Saved { entries: 0 }));
        assert_eq!(storage.raw(SLOT).as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_backed_round_trip() {
        let dir = TempDir::new().unwrap();
        let (mut store, outcome) = WatchlistStore::load(Box::new(FileStorage::new(dir.path())), SLOT);
        assert_eq!(outcome, LoadOutcome::Empty);
        store.add(entry(42, MediaKind::Series, "Answer"));

        let (reloaded, outcome) = WatchlistStore::load(Box::new(FileStorage::new(dir.path())), SLOT);
        assert_eq!(outcome, LoadOutcome::Loaded { entries: 1 });
        assert_eq!(reloaded.entries(), store.entries());
    }
}
