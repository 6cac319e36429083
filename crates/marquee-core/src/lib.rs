pub mod storage;
pub mod watchlist_store;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use watchlist_store::{LoadOutcome, PersistOutcome, WatchlistStore};
