//! History persistence interface.
//!
//! The core never touches storage itself. Callers load all histories once,
//! run the scheduler, and persist each change through a [`HistoryStore`]
//! before treating a review as committed.

use crate::error::HistoryError;
use crate::types::{CardEvent, CardHistory, CardId, Histories};

/// Load and update persisted card histories.
///
/// Implementations must keep event order and never rewrite `first_seen`:
/// inserting an identity that is already stored is a no-op, and appending to
/// an identity that is not stored is an error.
pub trait HistoryStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every stored history, orphans included.
    fn load(&self) -> Result<Histories, Self::Error>;

    /// Persist a newly created history.
    fn insert(&mut self, history: &CardHistory) -> Result<(), Self::Error>;

    /// Persist a batch of newly created histories.
    ///
    /// File-backed stores override this to touch storage once per batch.
    fn insert_all(&mut self, histories: &[CardHistory]) -> Result<(), Self::Error> {
        for history in histories {
            self.insert(history)?;
        }
        Ok(())
    }

    /// Persist one event appended to an existing history.
    fn append(&mut self, id: &CardId, event: &CardEvent) -> Result<(), Self::Error>;
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    histories: Histories,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn histories(&self) -> &Histories {
        &self.histories
    }
}

impl HistoryStore for MemoryStore {
    type Error = HistoryError;

    fn load(&self) -> Result<Histories, Self::Error> {
        Ok(self.histories.clone())
    }

    fn insert(&mut self, history: &CardHistory) -> Result<(), Self::Error> {
        self.histories
            .entry(history.id.clone())
            .or_insert_with(|| history.clone());
        Ok(())
    }

    fn append(&mut self, id: &CardId, event: &CardEvent) -> Result<(), Self::Error> {
        let history = self
            .histories
            .get_mut(id)
            .ok_or_else(|| HistoryError::UnknownCard(id.clone()))?;
        history.append_event(event.outcome, event.time);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_store_round_trip() {
        let id: CardId = ["doc.md", "A"].into_iter().collect();
        let seen = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut store = MemoryStore::new();

        let mut history = CardHistory::new(id.clone(), seen);
        store.insert(&history).unwrap();
        let event = history.append_event(Outcome::Increase, seen).clone();
        store.append(&id, &event).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded[&id], history);
    }

    #[test]
    fn insert_keeps_existing_first_seen() {
        let id: CardId = ["doc.md"].into_iter().collect();
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut store = MemoryStore::new();
        store.insert(&CardHistory::new(id.clone(), first)).unwrap();
        store.insert(&CardHistory::new(id.clone(), later)).unwrap();
        assert_eq!(store.histories()[&id].first_seen(), first);
    }

    #[test]
    fn append_to_unknown_card_fails() {
        let id: CardId = ["doc.md", "Missing"].into_iter().collect();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut store = MemoryStore::new();
        let event = CardEvent { time: at, outcome: Outcome::Same };

        let err = store.append(&id, &event).unwrap_err();
        assert_eq!(err, HistoryError::UnknownCard(id));
        assert_eq!(err.to_string(), "no history for card doc.md > Missing");
        assert!(store.histories().is_empty());
    }

    #[test]
    fn insert_all_skips_known_cards() {
        let a: CardId = ["doc.md", "A"].into_iter().collect();
        let b: CardId = ["doc.md", "B"].into_iter().collect();
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let mut store = MemoryStore::new();
        store.insert(&CardHistory::new(a.clone(), first)).unwrap();

        let batch = [CardHistory::new(a.clone(), later), CardHistory::new(b.clone(), later)];
        store.insert_all(&batch).unwrap();

        assert_eq!(store.histories().len(), 2);
        assert_eq!(store.histories()[&a].first_seen(), first);
        assert_eq!(store.histories()[&b].first_seen(), later);
    }
}
