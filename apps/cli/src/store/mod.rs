//! File-backed history stores.

pub mod error;
pub mod journal;
pub mod snapshot;

pub use error::StoreError;
pub use journal::JournalStore;
pub use snapshot::SnapshotStore;

use crate::config::HistoryFormat;
use mdcards_core::{CardEvent, CardHistory, CardId, Histories, HistoryStore};
use std::path::Path;

/// Store selected by configuration.
#[derive(Debug, Clone)]
pub enum FileStore {
    Journal(JournalStore),
    Snapshot(SnapshotStore),
}

impl FileStore {
    pub fn open(root: &Path, format: HistoryFormat) -> Self {
        match format {
            HistoryFormat::Journal => Self::Journal(JournalStore::in_root(root)),
            HistoryFormat::Snapshot => Self::Snapshot(SnapshotStore::in_root(root)),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Journal(store) => store.path(),
            Self::Snapshot(store) => store.path(),
        }
    }
}

impl HistoryStore for FileStore {
    type Error = StoreError;

    fn load(&self) -> Result<Histories, Self::Error> {
        match self {
            Self::Journal(store) => store.load(),
            Self::Snapshot(store) => store.load(),
        }
    }

    fn insert(&mut self, history: &CardHistory) -> Result<(), Self::Error> {
        match self {
            Self::Journal(store) => store.insert(history),
            Self::Snapshot(store) => store.insert(history),
        }
    }

    fn insert_all(&mut self, histories: &[CardHistory]) -> Result<(), Self::Error> {
        match self {
            Self::Journal(store) => store.insert_all(histories),
            Self::Snapshot(store) => store.insert_all(histories),
        }
    }

    fn append(&mut self, id: &CardId, event: &CardEvent) -> Result<(), Self::Error> {
        match self {
            Self::Journal(store) => store.append(id, event),
            Self::Snapshot(store) => store.append(id, event),
        }
    }
}
