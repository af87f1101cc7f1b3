//! Error types for mdcards-core.

use crate::types::CardId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using IndexError.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Structural errors found while indexing a document.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("{document}:{line}: heading level {depth} skips a level (parent depth {parent_depth})")]
    SkippedLevel {
        document: String,
        line: usize,
        depth: usize,
        parent_depth: usize,
    },

    #[error("{document}:{line}: duplicate heading {heading:?}")]
    DuplicateHeading {
        document: String,
        line: usize,
        heading: String,
    },

    #[error("{document}:{line}: empty heading")]
    EmptyHeading { document: String, line: usize },
}

/// Errors raised while reading a corpus from disk.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus root {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Store updates that do not match what is stored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("no history for card {0}")]
    UnknownCard(CardId),
}

/// Boundary validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown outcome {0:?}, expected one of again, decrease, same, increase")]
    UnknownOutcome(String),

    #[error("rating {0} out of range, expected 1-4")]
    RatingOutOfRange(u8),
}
