//! List the due queue.

use super::Session;
use anyhow::Result;
use chrono::Local;

pub fn execute(session: &Session, limit: Option<usize>) -> Result<()> {
    let due = session.due();
    if due.is_empty() {
        println!("No cards due.");
        return Ok(());
    }

    let shown = limit.unwrap_or(due.len()).min(due.len());
    for (position, entry) in due.iter().take(shown).enumerate() {
        let marker = if entry.priority { "*" } else { " " };
        let due_date = entry.history.due_date().with_timezone(&Local);
        println!(
            "{:>4} {} {}  (due {})",
            position + 1,
            marker,
            entry.card.id,
            due_date.format("%Y-%m-%d")
        );
    }
    println!("{} cards due", due.len());
    Ok(())
}
