//! CLI commands.

pub mod due;
pub mod index;
pub mod next;
pub mod rate;
pub mod stats;

use crate::config::Settings;
use crate::store::FileStore;
use anyhow::{Context, Result};
use chrono::Utc;
use mdcards_core::{
    ensure_histories, index, load_documents, select_due, Card, DueCard, Histories, HistoryStore,
};
use tracing::info;

/// Any structural error stops the whole corpus from loading.
pub const INDEX_ABORTED: &str = "indexing aborted, no cards were loaded";

/// Indexed corpus with its histories loaded and new cards registered.
pub struct Session {
    pub settings: Settings,
    pub cards: Vec<Card>,
    pub histories: Histories,
    pub store: FileStore,
}

impl Session {
    pub fn open(settings: Settings) -> Result<Self> {
        let documents = load_documents(&settings.root)?;
        let cards = index(&documents).context(INDEX_ABORTED)?;

        let mut store = FileStore::open(&settings.root, settings.history_format);
        let mut histories = store
            .load()
            .with_context(|| format!("failed to load histories from {}", store.path().display()))?;

        let created = ensure_histories(&cards, &mut histories, Utc::now());
        store
            .insert_all(&created)
            .with_context(|| {
                format!("failed to register new cards in {}", store.path().display())
            })?;
        if !created.is_empty() {
            info!(count = created.len(), "new cards");
        }

        Ok(Self {
            settings,
            cards,
            histories,
            store,
        })
    }

    /// Card with the given `doc > heading` identity, if indexed.
    pub fn find_card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id.to_string() == id)
    }

    /// Current due queue, head first.
    pub fn due(&self) -> Vec<DueCard<'_>> {
        select_due(&self.cards, &self.histories, Utc::now(), &self.settings.ranking)
    }
}
