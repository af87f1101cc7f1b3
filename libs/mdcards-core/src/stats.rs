//! Review statistics for the stats view.

use crate::types::{Card, Histories};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of the current corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudyStats {
    pub total_cards: usize,
    pub due_now: usize,
    pub done_today: usize,
    pub never_reviewed: usize,
    /// Cards per due day. Overdue cards are counted on today.
    pub due_by_day: BTreeMap<NaiveDate, usize>,
}

/// Summarize `cards`. Cards without a history count as due today.
pub fn summarize<Tz: TimeZone>(
    cards: &[Card],
    histories: &Histories,
    now: &DateTime<Tz>,
) -> StudyStats {
    let now_utc = now.with_timezone(&Utc);
    let today = now.date_naive();
    let tz = now.timezone();
    let mut stats = StudyStats {
        total_cards: cards.len(),
        ..Default::default()
    };

    for card in cards {
        let Some(history) = histories.get(&card.id) else {
            stats.never_reviewed += 1;
            *stats.due_by_day.entry(today).or_default() += 1;
            continue;
        };

        if history.events().is_empty() {
            stats.never_reviewed += 1;
        }
        if history.is_due(now_utc) {
            stats.due_now += 1;
        }
        if history.done_today(now) {
            stats.done_today += 1;
        }
        let due_day = history.due_date().with_timezone(&tz).date_naive().max(today);
        *stats.due_by_day.entry(due_day).or_default() += 1;
    }

    stats
}
