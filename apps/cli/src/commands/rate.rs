//! Record the outcome of reviewing a card shown by `next`.

use super::Session;
use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use mdcards_core::{HistoryStore, Outcome};
use tracing::info;

/// Rate the card named `card` (`doc > heading > ...`, as printed by `next`).
///
/// The card must still be due. The head of the queue is never substituted,
/// since it can change between `next` and `rate`.
pub fn execute(session: &mut Session, card: &str, outcome: Outcome) -> Result<()> {
    let due = session
        .due()
        .into_iter()
        .find(|entry| entry.card.id.to_string() == card)
        .map(|entry| entry.card.id.clone());
    let Some(id) = due else {
        if session.find_card(card).is_some() {
            bail!("card {card} is not due");
        }
        bail!("no card {card} in the corpus");
    };

    let history = session
        .histories
        .get_mut(&id)
        .context("due card has no history")?;
    let event = history.append_event(outcome, Utc::now()).clone();

    // Persist before reporting; a failed write means the review did not happen.
    session.store.append(&id, &event)?;
    info!(card = %id, %outcome, "recorded review");

    let next_due = history.due_date().with_timezone(&Local);
    println!(
        "{}: {} ({}), interval {} days, next due {}",
        id,
        outcome,
        outcome.label(),
        history.interval_days(),
        next_due.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}
