//! Text summary of the corpus schedule.

use super::Session;
use anyhow::Result;
use chrono::Local;
use mdcards_core::summarize;

const BAR_WIDTH: usize = 40;

pub fn execute(session: &Session, json: bool) -> Result<()> {
    let stats = summarize(&session.cards, &session.histories, &Local::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Number of cards: {}", stats.total_cards);
    println!("Due now: {}", stats.due_now);
    println!("Done today: {}", stats.done_today);
    println!("Never reviewed: {}", stats.never_reviewed);
    println!("Orphaned histories: {}", session.histories.len().saturating_sub(stats.total_cards));

    let widest = stats.due_by_day.values().copied().max().unwrap_or(0);
    for (day, count) in &stats.due_by_day {
        let width = if widest == 0 { 0 } else { (count * BAR_WIDTH).div_ceil(widest) };
        println!("{}  {:>5}  {}", day, count, "#".repeat(width));
    }
    Ok(())
}
