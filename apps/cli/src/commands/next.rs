//! Show the next card to review.

use super::Session;
use anyhow::Result;
use mdcards_core::Outcome;

pub fn execute(session: &Session, show: bool) -> Result<()> {
    let due = session.due();
    let Some(head) = due.first() else {
        println!("No cards due.");
        return Ok(());
    };

    println!(
        "due={}, file={}, root={}",
        due.len(),
        head.card.id.document(),
        session.settings.root.display()
    );
    println!("card={}", head.card.id);
    println!("---");
    for (depth, heading) in head.card.id.headings().iter().enumerate() {
        println!("{} {}", "#".repeat(depth + 2), heading);
    }

    if show {
        println!();
        print!("{}", head.card.body);
    }

    println!("---");
    let options: Vec<String> = Outcome::ALL
        .iter()
        .map(|outcome| format!("{} ({})", outcome, outcome.label()))
        .collect();
    println!("rate with: {}", options.join(", "));
    println!("  mdcards rate <outcome> --card \"{}\"", head.card.id);
    Ok(())
}
