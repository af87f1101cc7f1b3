//! Reading a directory of markdown documents.

use crate::error::CorpusError;
use crate::types::Document;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Read every `.md` file under `root`, sorted by relative path.
///
/// Hidden files and directories are skipped. Each document is named by its
/// path relative to `root`, with `/` separators on every platform.
pub fn load_documents(root: &Path) -> Result<Vec<Document>, CorpusError> {
    if !root.is_dir() {
        return Err(CorpusError::NotADirectory(root.to_path_buf()));
    }

    let mut documents = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = entry.map_err(|source| CorpusError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "md") {
            continue;
        }

        let content = fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let relative = path.strip_prefix(root).unwrap_or(path);
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        documents.push(Document {
            name,
            path: path.to_path_buf(),
            content,
        });
    }

    documents.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(root = %root.display(), documents = documents.len(), "loaded corpus");
    Ok(documents)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().map_or(false, |name| name.starts_with('.'))
}
