//! Validate the corpus and list what it yields.

use crate::config::Settings;
use super::INDEX_ABORTED;
use anyhow::{Context, Result};
use mdcards_core::{load_documents, parse_document};

pub fn execute(settings: &Settings) -> Result<()> {
    let documents = load_documents(&settings.root)?;

    let mut total = 0;
    for document in &documents {
        let cards = parse_document(document).context(INDEX_ABORTED)?;
        println!("  {}: {} cards", document.name, cards.len());
        total += cards.len();
    }

    println!("{} cards in {} documents", total, documents.len());
    Ok(())
}
