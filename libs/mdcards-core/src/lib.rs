//! Core library for heading-based markdown flashcards.
//!
//! Provides:
//! - Document indexer turning heading paths into card identities
//! - Event-sourced spaced repetition scheduler (doubling/halving SM-2 variant)
//! - Deterministic due queue ranking
//! - History store interface and review statistics

pub mod corpus;
pub mod error;
pub mod parser;
pub mod ranking;
pub mod scheduler;
pub mod stats;
pub mod store;
pub mod types;

pub use corpus::load_documents;
pub use error::{CorpusError, HistoryError, IndexError, Result, ValidationError};
pub use parser::{index, parse_document};
pub use ranking::{select_due, DueCard};
pub use scheduler::ensure_histories;
pub use stats::{summarize, StudyStats};
pub use store::{HistoryStore, MemoryStore};
pub use types::{
    Card, CardEvent, CardHistory, CardId, Document, Histories, Outcome, RankingPolicy,
};
