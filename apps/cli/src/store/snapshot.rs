//! Whole-file JSON snapshot of every history.

use super::error::StoreError;
use mdcards_core::{CardEvent, CardHistory, CardId, Histories, HistoryStore};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SNAPSHOT_FILE: &str = ".flashcards.json";

/// Rewrites the snapshot on every change.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_root(root: &Path) -> Self {
        Self::new(root.join(SNAPSHOT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, histories: &Histories) -> Result<(), StoreError> {
        let records: Vec<&CardHistory> = histories.values().collect();
        let json = serde_json::to_string_pretty(&records)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(StoreError::io(&tmp))?;
        fs::rename(&tmp, &self.path).map_err(StoreError::io(&self.path))
    }
}

impl HistoryStore for SnapshotStore {
    type Error = StoreError;

    fn load(&self) -> Result<Histories, Self::Error> {
        if !self.path.exists() {
            return Ok(Histories::new());
        }
        let content = fs::read_to_string(&self.path).map_err(StoreError::io(&self.path))?;
        let records: Vec<CardHistory> =
            serde_json::from_str(&content).map_err(|source| StoreError::InvalidRecord {
                path: self.path.clone(),
                line: source.line(),
                source,
            })?;

        let mut histories = Histories::new();
        for record in records {
            if histories.contains_key(&record.id) {
                return Err(StoreError::DuplicateCard {
                    path: self.path.clone(),
                    line: 0,
                    id: record.id.to_string(),
                });
            }
            histories.insert(record.id.clone(), record);
        }
        Ok(histories)
    }

    fn insert(&mut self, history: &CardHistory) -> Result<(), Self::Error> {
        self.insert_all(std::slice::from_ref(history))
    }

    fn insert_all(&mut self, batch: &[CardHistory]) -> Result<(), Self::Error> {
        let mut histories = self.load()?;
        let before = histories.len();
        for history in batch {
            histories
                .entry(history.id.clone())
                .or_insert_with(|| history.clone());
        }
        if histories.len() == before {
            return Ok(());
        }
        debug!(path = %self.path.display(), added = histories.len() - before, "rewriting snapshot");
        self.write(&histories)
    }

    fn append(&mut self, id: &CardId, event: &CardEvent) -> Result<(), Self::Error> {
        let mut histories = self.load()?;
        let Some(history) = histories.get_mut(id) else {
            return Err(StoreError::UnknownCard {
                path: self.path.clone(),
                line: 0,
                id: id.to_string(),
            });
        };
        history.append_event(event.outcome, event.time);
        self.write(&histories)
    }
}
