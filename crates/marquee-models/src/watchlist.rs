use serde::{Deserialize, Serialize};
use crate::media::MediaKind;

/// A saved catalog item.
///
/// `title` and `poster_path` are a snapshot taken when the entry was added;
/// they are never re-synced with the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchlistEntry {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub title: String,
    pub poster_path: Option<String>,
}

/// Identity of a watchlist entry. The same numeric id may exist once per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub id: u64,
    pub kind: MediaKind,
}

impl WatchlistEntry {
    pub fn new(id: u64, kind: MediaKind, title: impl Into<String>, poster_path: Option<String>) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            poster_path,
        }
    }

    pub fn key(&self) -> EntryKey {
        EntryKey { id: self.id, kind: self.kind }
    }

    pub fn matches(&self, id: u64, kind: MediaKind) -> bool {
        self.id == id && self.kind == kind
    }
}
