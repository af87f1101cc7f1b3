//! Append-only JSON lines journal.
//!
//! ```text
//! {"kind":"seen","id":["rust.md","Traits"],"at":"2024-03-01T09:00:00Z"}
//! {"kind":"event","id":["rust.md","Traits"],"time":"2024-03-02T08:12:40Z","type":"increase"}
//! ```

use super::error::StoreError;
use chrono::{DateTime, Utc};
use mdcards_core::{CardEvent, CardHistory, CardId, Histories, HistoryStore, Outcome};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const JOURNAL_FILE: &str = ".flashcards.jsonl";

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Record {
    Seen {
        id: CardId,
        at: DateTime<Utc>,
    },
    Event {
        id: CardId,
        time: DateTime<Utc>,
        #[serde(rename = "type")]
        outcome: Outcome,
    },
}

/// Journal file that only ever grows.
#[derive(Debug, Clone)]
pub struct JournalStore {
    path: PathBuf,
}

impl JournalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Journal at its default location inside the corpus root.
    pub fn in_root(root: &Path) -> Self {
        Self::new(root.join(JOURNAL_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_records(&self, records: &[Record]) -> Result<(), StoreError> {
        let mut lines = String::new();
        for record in records {
            lines.push_str(&serde_json::to_string(record)?);
            lines.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(StoreError::io(&self.path))?;
        file.write_all(lines.as_bytes())
            .and_then(|_| file.sync_data())
            .map_err(StoreError::io(&self.path))
    }

    fn replay(&self, content: &str) -> Result<Histories, StoreError> {
        let mut histories = Histories::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let record: Record =
                serde_json::from_str(raw).map_err(|source| StoreError::InvalidRecord {
                    path: self.path.clone(),
                    line,
                    source,
                })?;

            match record {
                Record::Seen { id, at } => {
                    if histories.contains_key(&id) {
                        return Err(StoreError::DuplicateCard {
                            path: self.path.clone(),
                            line,
                            id: id.to_string(),
                        });
                    }
                    histories.insert(id.clone(), CardHistory::new(id, at));
                }
                Record::Event { id, time, outcome } => {
                    let Some(history) = histories.get_mut(&id) else {
                        return Err(StoreError::UnknownCard {
                            path: self.path.clone(),
                            line,
                            id: id.to_string(),
                        });
                    };
                    history.append_event(outcome, time);
                }
            }
        }

        Ok(histories)
    }
}

impl HistoryStore for JournalStore {
    type Error = StoreError;

    fn load(&self) -> Result<Histories, Self::Error> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no journal yet");
            return Ok(Histories::new());
        }
        let content = fs::read_to_string(&self.path).map_err(StoreError::io(&self.path))?;
        let histories = self.replay(&content)?;
        debug!(path = %self.path.display(), histories = histories.len(), "replayed journal");
        Ok(histories)
    }

    fn insert(&mut self, history: &CardHistory) -> Result<(), Self::Error> {
        self.insert_all(std::slice::from_ref(history))
    }

    fn insert_all(&mut self, histories: &[CardHistory]) -> Result<(), Self::Error> {
        let known = self.load()?;
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for history in histories {
            if known.contains_key(&history.id) || !seen.insert(&history.id) {
                continue;
            }
            records.push(Record::Seen {
                id: history.id.clone(),
                at: history.first_seen(),
            });
            records.extend(history.events().iter().map(|event| Record::Event {
                id: history.id.clone(),
                time: event.time,
                outcome: event.outcome,
            }));
        }
        if records.is_empty() {
            return Ok(());
        }
        debug!(path = %self.path.display(), records = records.len(), "appending to journal");
        self.write_records(&records)
    }

    fn append(&mut self, id: &CardId, event: &CardEvent) -> Result<(), Self::Error> {
        if !self.load()?.contains_key(id) {
            return Err(StoreError::UnknownCard {
                path: self.path.clone(),
                line: 0,
                id: id.to_string(),
            });
        }
        self.write_records(&[Record::Event {
            id: id.clone(),
            time: event.time,
            outcome: event.outcome,
        }])
    }
}
