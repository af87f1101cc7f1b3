//! History store error types.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: invalid history record: {source}")]
    InvalidRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}:{line}: event for unknown card {id}")]
    UnknownCard {
        path: PathBuf,
        line: usize,
        id: String,
    },

    #[error("{path}:{line}: card {id} recorded as first seen twice")]
    DuplicateCard {
        path: PathBuf,
        line: usize,
        id: String,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
