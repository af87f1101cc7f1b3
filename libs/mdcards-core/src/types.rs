//! Core types for the flashcard library.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Heading path identifying a card.
///
/// The first element is the document name, the rest are the headings leading
/// to the card. Renaming a heading yields a different identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(Vec<String>);

impl CardId {
    pub fn new(parts: Vec<String>) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Name of the document the card came from.
    pub fn document(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or("")
    }

    /// Headings below the document root.
    pub fn headings(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }
}

impl<S: Into<String>> FromIterator<S> for CardId {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" > "))
    }
}

/// Source document read into memory.
#[derive(Debug, Clone)]
pub struct Document {
    /// Root element of every identity in this document.
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            name,
            content: content.into(),
        }
    }
}

/// Card extracted from a document. Rebuilt on every indexing pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub body: String,
    pub source: PathBuf,
}

/// Result of a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Again,
    Decrease,
    Same,
    Increase,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [Self::Again, Self::Decrease, Self::Same, Self::Increase];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Decrease => "decrease",
            Self::Same => "same",
            Self::Increase => "increase",
        }
    }

    /// Button caption shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Again => "Failed",
            Self::Decrease => "Hard",
            Self::Same => "OK",
            Self::Increase => "Easy",
        }
    }

    /// Create from 4-point numeric rating (1 = Failed .. 4 = Easy).
    pub fn from_value(value: u8) -> Result<Self, ValidationError> {
        match value {
            1 => Ok(Self::Again),
            2 => Ok(Self::Decrease),
            3 => Ok(Self::Same),
            4 => Ok(Self::Increase),
            _ => Err(ValidationError::RatingOutOfRange(value)),
        }
    }
}

impl FromStr for Outcome {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|outcome| outcome.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownOutcome(s.to_string()))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable review event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEvent {
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub outcome: Outcome,
}

/// Append-only review log for one card.
///
/// Scheduling state is derived from `events` on demand, see [`crate::scheduler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardHistory {
    pub id: CardId,
    events: Vec<CardEvent>,
    first_seen: DateTime<Utc>,
}

impl CardHistory {
    /// History for a card observed for the first time at `first_seen`.
    pub fn new(id: CardId, first_seen: DateTime<Utc>) -> Self {
        Self {
            id,
            events: Vec::new(),
            first_seen,
        }
    }

    /// Rebuild a history from persisted parts.
    pub fn from_parts(id: CardId, first_seen: DateTime<Utc>, events: Vec<CardEvent>) -> Self {
        Self {
            id,
            events,
            first_seen,
        }
    }

    pub fn events(&self) -> &[CardEvent] {
        &self.events
    }

    pub fn first_seen(&self) -> DateTime<Utc> {
        self.first_seen
    }

    pub fn last_event(&self) -> Option<&CardEvent> {
        self.events.last()
    }

    /// Record a review. This is the only way a history changes.
    pub fn append_event(&mut self, outcome: Outcome, at: DateTime<Utc>) -> &CardEvent {
        self.events.push(CardEvent { time: at, outcome });
        &self.events[self.events.len() - 1]
    }
}

/// All known histories keyed by card identity, including orphaned ones.
pub type Histories = BTreeMap<CardId, CardHistory>;

/// Ordering policy for the due queue.
///
/// With the default (empty) policy the queue is ordered by digest alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingPolicy {
    /// Cards first seen at or after this instant are shown first.
    pub priority_since: Option<DateTime<Utc>>,
    /// Document name prefixes whose cards are always shown first.
    pub priority_sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn outcome_parses_known_tags() {
        for outcome in Outcome::ALL {
            assert_eq!(outcome.as_str().parse::<Outcome>(), Ok(outcome));
        }
    }

    #[test]
    fn outcome_rejects_unknown_tag() {
        assert_eq!(
            "Again".parse::<Outcome>(),
            Err(ValidationError::UnknownOutcome("Again".to_string()))
        );
        assert!("good".parse::<Outcome>().is_err());
    }

    #[test]
    fn outcome_from_rating_value() {
        assert_eq!(Outcome::from_value(1), Ok(Outcome::Again));
        assert_eq!(Outcome::from_value(4), Ok(Outcome::Increase));
        assert_eq!(Outcome::from_value(0), Err(ValidationError::RatingOutOfRange(0)));
        assert_eq!(Outcome::from_value(5), Err(ValidationError::RatingOutOfRange(5)));
    }

    #[test]
    fn event_serializes_outcome_as_type() {
        let event = CardEvent {
            time: "2024-03-01T10:00:00Z".parse().unwrap(),
            outcome: Outcome::Increase,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"time":"2024-03-01T10:00:00Z","type":"increase"}"#);
    }

    #[test]
    fn history_rejects_unknown_outcome_tag() {
        let json = concat!(
            r#"{"id":["a.md"],"events":[{"time":"2024-03-01T10:00:00Z","type":"easy"}],"#,
            r#""first_seen":"2024-03-01T09:00:00Z"}"#,
        );
        assert!(serde_json::from_str::<CardHistory>(json).is_err());
    }

    #[test]
    fn history_requires_first_seen() {
        let json = r#"{"id":["a.md"],"events":[]}"#;
        assert!(serde_json::from_str::<CardHistory>(json).is_err());
    }

    #[test]
    fn card_id_accessors() {
        let id: CardId = ["notes.md", "Rust", "Traits"].into_iter().collect();
        assert_eq!(id.document(), "notes.md");
        assert_eq!(id.headings(), ["Rust".to_string(), "Traits".to_string()]);
        assert_eq!(id.to_string(), "notes.md > Rust > Traits");
    }
}
