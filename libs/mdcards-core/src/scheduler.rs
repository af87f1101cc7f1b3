//! Event-sourced spaced repetition.
//!
//! A doubling/halving variant of SM-2. Nothing is cached: the interval and
//! due date are replayed from the card's event log every time they are asked
//! for.

use crate::types::{Card, CardHistory, Histories, Outcome};
use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::debug;

/// Interval of a card with no reviews.
pub const INITIAL_INTERVAL_DAYS: u32 = 1;
/// Shortest interval `decrease` can reach.
pub const MIN_INTERVAL_DAYS: u32 = 1;
/// Longest interval `increase` can reach.
pub const MAX_INTERVAL_DAYS: u32 = 365;

impl CardHistory {
    /// Current review interval in whole days.
    pub fn interval_days(&self) -> u32 {
        self.events()
            .iter()
            .fold(INITIAL_INTERVAL_DAYS, |days, event| match event.outcome {
                Outcome::Again | Outcome::Same => days,
                Outcome::Decrease => (days / 2).max(MIN_INTERVAL_DAYS),
                Outcome::Increase => days.saturating_mul(2).min(MAX_INTERVAL_DAYS),
            })
    }

    pub fn interval(&self) -> Duration {
        Duration::days(i64::from(self.interval_days()))
    }

    /// When the card becomes eligible for review.
    ///
    /// Trailing `again` events are ignored: a failed attempt does not move
    /// the schedule.
    pub fn due_date(&self) -> DateTime<Utc> {
        match self
            .events()
            .iter()
            .rev()
            .find(|event| event.outcome != Outcome::Again)
        {
            Some(event) => event.time + self.interval(),
            None => self.first_seen(),
        }
    }

    /// Strictly overdue at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date() < now
    }

    /// Whether the latest review on `now`'s calendar day was a success.
    ///
    /// The day boundary is taken in `now`'s time zone.
    pub fn done_today<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        let today = now.date_naive();
        let tz = now.timezone();
        self.events()
            .iter()
            .rev()
            .find(|event| event.time.with_timezone(&tz).date_naive() == today)
            .map_or(false, |event| event.outcome != Outcome::Again)
    }
}

/// Current interval of `history`.
pub fn get_interval(history: &CardHistory) -> Duration {
    history.interval()
}

/// Due date of `history`.
pub fn get_due_date(history: &CardHistory) -> DateTime<Utc> {
    history.due_date()
}

/// See [`CardHistory::done_today`].
pub fn done_today<Tz: TimeZone>(history: &CardHistory, now: &DateTime<Tz>) -> bool {
    history.done_today(now)
}

/// Append a review and return the updated history.
pub fn append_event(mut history: CardHistory, outcome: Outcome, now: DateTime<Utc>) -> CardHistory {
    history.append_event(outcome, now);
    history
}

/// Start a history for every card that has none, first seen at `now`.
///
/// Existing histories are left alone so `first_seen` is only ever set once.
/// Returns the created histories so the caller can persist them.
pub fn ensure_histories(
    cards: &[Card],
    histories: &mut Histories,
    now: DateTime<Utc>,
) -> Vec<CardHistory> {
    let mut created = Vec::new();
    for card in cards {
        if histories.contains_key(&card.id) {
            continue;
        }
        let history = CardHistory::new(card.id.clone(), now);
        histories.insert(card.id.clone(), history.clone());
        created.push(history);
    }
    if !created.is_empty() {
        debug!(count = created.len(), "started histories for new cards");
    }
    created
}
