//! Due queue selection and ordering.

use crate::types::{Card, CardHistory, Histories, RankingPolicy};
use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Card selected for review, with the data its position was derived from.
#[derive(Debug, Clone)]
pub struct DueCard<'a> {
    pub card: &'a Card,
    pub history: &'a CardHistory,
    pub priority: bool,
    pub digest: String,
}

/// Cards overdue at `now`, in presentation order. The first entry is shown next.
///
/// The order is a total order over `(priority first, digest, identity)`, so
/// identical inputs always produce the same queue. The digest only changes
/// when a card is reviewed, which reshuffles it within its priority group.
pub fn select_due<'a>(
    cards: &'a [Card],
    histories: &'a Histories,
    now: DateTime<Utc>,
    policy: &RankingPolicy,
) -> Vec<DueCard<'a>> {
    let mut due: Vec<DueCard<'a>> = cards
        .iter()
        .filter_map(|card| {
            let Some(history) = histories.get(&card.id) else {
                debug!(card = %card.id, "card has no history yet, not selectable");
                return None;
            };
            history.is_due(now).then(|| DueCard {
                card,
                history,
                priority: is_priority(card, history, policy),
                digest: shuffle_digest(history),
            })
        })
        .collect();

    due.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.digest.cmp(&b.digest))
            .then_with(|| a.card.id.cmp(&b.card.id))
    });
    due
}

/// Whether the policy moves this card ahead of the rest of the queue.
pub fn is_priority(card: &Card, history: &CardHistory, policy: &RankingPolicy) -> bool {
    let recent = policy
        .priority_since
        .map_or(false, |since| history.first_seen() >= since);
    let source = card.id.document();
    recent
        || policy
            .priority_sources
            .iter()
            .any(|prefix| source.starts_with(prefix.as_str()))
}

/// Hex SHA-256 over the identity and the latest review time.
pub fn shuffle_digest(history: &CardHistory) -> String {
    let mut hasher = Sha256::new();
    for part in history.id.parts() {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    match history.last_event() {
        Some(event) => hasher.update(event.time.to_rfc3339_opts(SecondsFormat::Nanos, true)),
        None => hasher.update(b"none"),
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CardId, Outcome};
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn card(parts: &[&str]) -> Card {
        Card {
            id: parts.iter().copied().collect(),
            body: "body\n".to_string(),
            source: PathBuf::from(parts[0]),
        }
    }

    fn fixture() -> (Vec<Card>, Histories) {
        let cards: Vec<Card> = (0..20)
            .map(|n| {
                let document = if n % 2 == 0 { "rust.md" } else { "inbox/new.md" };
                card(&[document, format!("Q{n}").as_str()])
            })
            .collect();
        let mut histories = Histories::new();
        for (n, card) in cards.iter().enumerate() {
            let first_seen = t0() - Duration::days(30) + Duration::days(n as i64);
            let mut history = CardHistory::new(card.id.clone(), first_seen);
            if n % 3 == 0 {
                history.append_event(Outcome::Same, t0() - Duration::days(5));
            }
            histories.insert(card.id.clone(), history);
        }
        (cards, histories)
    }

    fn ids(due: &[DueCard<'_>]) -> Vec<CardId> {
        due.iter().map(|d| d.card.id.clone()).collect()
    }

    #[test]
    fn selects_only_overdue_cards() {
        let cards = vec![
            card(&["a.md", "old"]),
            card(&["a.md", "fresh"]),
            card(&["a.md", "reviewed"]),
        ];
        let mut histories = Histories::new();
        let old = CardHistory::new(cards[0].id.clone(), t0() - Duration::days(1));
        histories.insert(cards[0].id.clone(), old);
        let fresh = CardHistory::new(cards[1].id.clone(), t0());
        histories.insert(cards[1].id.clone(), fresh);
        let mut reviewed = CardHistory::new(cards[2].id.clone(), t0() - Duration::days(3));
        reviewed.append_event(Outcome::Increase, t0() - Duration::hours(1));
        histories.insert(cards[2].id.clone(), reviewed);

        let due = select_due(&cards, &histories, t0(), &RankingPolicy::default());
        assert_eq!(ids(&due), vec![cards[0].id.clone()]);
    }

    #[test]
    fn cards_without_history_are_skipped() {
        let cards = vec![card(&["a.md", "A"])];
        let histories = Histories::new();
        let due = select_due(&cards, &histories, t0(), &RankingPolicy::default());
        assert!(due.is_empty());
    }

    #[test]
    fn no_due_cards_is_empty() {
        let histories = Histories::new();
        let due = select_due(&[], &histories, t0(), &RankingPolicy::default());
        assert!(due.is_empty());
    }

    #[test]
    fn ordering_is_deterministic() {
        let (cards, histories) = fixture();
        let policy = RankingPolicy::default();
        let first = ids(&select_due(&cards, &histories, t0(), &policy));
        let second = ids(&select_due(&cards, &histories, t0(), &policy));
        assert_eq!(first.len(), 20);
        assert_eq!(first, second);
    }

    #[test]
    fn default_policy_orders_by_digest() {
        let (cards, histories) = fixture();
        let due = select_due(&cards, &histories, t0(), &RankingPolicy::default());
        assert!(due.iter().all(|d| !d.priority));
        assert!(due.windows(2).all(|w| w[0].digest <= w[1].digest));
    }

    #[test]
    fn priority_sources_come_first() {
        let (cards, histories) = fixture();
        let policy = RankingPolicy {
            priority_sources: vec!["inbox/".to_string()],
            ..Default::default()
        };
        let due = select_due(&cards, &histories, t0(), &policy);
        let split = due.iter().position(|d| !d.priority).unwrap();
        assert_eq!(split, 10);
        assert!(due[..split].iter().all(|d| d.card.id.document() == "inbox/new.md"));
        assert!(due[split..].iter().all(|d| d.card.id.document() == "rust.md"));
    }

    #[test]
    fn recently_seen_cards_come_first() {
        let (cards, histories) = fixture();
        let since = t0() - Duration::days(15);
        let policy = RankingPolicy {
            priority_since: Some(since),
            ..Default::default()
        };
        let due = select_due(&cards, &histories, t0(), &policy);
        let flags: Vec<bool> = due.iter().map(|d| d.priority).collect();
        assert!(flags.windows(2).all(|w| w[0] >= w[1]));
        assert!(due
            .iter()
            .all(|d| d.priority == (d.history.first_seen() >= since)));
    }

    #[test]
    fn digest_changes_after_review() {
        let (_, histories) = fixture();
        let mut history = histories.values().next().unwrap().clone();
        let before = shuffle_digest(&history);
        history.append_event(Outcome::Again, t0());
        assert_ne!(before, shuffle_digest(&history));
        assert_eq!(before.len(), 64);
    }
}
