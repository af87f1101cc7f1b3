//! Heading-based card extraction.
//!
//! # Format
//! ```markdown
//! Intro text belongs to the document itself.
//!
//! # Ownership
//! Every value has a single owner.
//!
//! ## Borrowing
//! References without taking ownership.
//!
//! ## Lifetimes
//! <!-- flashcards: skip -->
//! Not turned into a card.
//! ```
//!
//! Each heading opens a card whose identity is the heading path under the
//! document name. `#` and `##` both sit directly below the document root,
//! `###` nests under the preceding heading, and so on. Lines starting with
//! `---` toggle whether text is stored, which keeps front matter out of bodies.

use crate::error::{IndexError, Result};
use crate::types::{Card, CardId, Document};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Index every document, in order. Fails on the first malformed document.
pub fn index(documents: &[Document]) -> Result<Vec<Card>> {
    let mut cards = Vec::new();
    for document in documents {
        cards.extend(parse_document(document)?);
    }
    debug!(documents = documents.len(), cards = cards.len(), "indexed corpus");
    Ok(cards)
}

/// Extract the cards of a single document.
pub fn parse_document(document: &Document) -> Result<Vec<Card>> {
    let mut parser = Parser::new(document);

    for (idx, line) in document.content.lines().enumerate() {
        parser.process_line(line, idx + 1)?;
    }

    Ok(parser.finalize())
}

struct Parser<'a> {
    document: &'a Document,
    headings: Vec<String>,
    declared: HashSet<Vec<String>>,
    should_store: bool,
    bodies: Vec<(CardId, String)>,
    positions: HashMap<CardId, usize>,
    skipped: HashSet<CardId>,
}

impl<'a> Parser<'a> {
    fn new(document: &'a Document) -> Self {
        Self {
            document,
            headings: vec![document.name.clone()],
            declared: HashSet::new(),
            should_store: true,
            bodies: Vec::new(),
            positions: HashMap::new(),
            skipped: HashSet::new(),
        }
    }

    fn process_line(&mut self, line: &str, line_num: usize) -> Result<()> {
        match LineType::parse(line) {
            LineType::Heading { level, text } => self.handle_heading(level, text, line_num)?,
            LineType::Skip => {
                self.skipped.insert(self.current_id());
            }
            LineType::Delimiter => self.should_store = !self.should_store,
            LineType::Text(text) => {
                if self.should_store {
                    self.store(text);
                }
            }
        }
        Ok(())
    }

    fn handle_heading(&mut self, level: usize, text: &str, line_num: usize) -> Result<()> {
        let depth = level.saturating_sub(1).max(1);
        if depth > self.headings.len() {
            return Err(IndexError::SkippedLevel {
                document: self.document.name.clone(),
                line: line_num,
                depth,
                parent_depth: self.headings.len(),
            });
        }

        let heading = text.trim();
        if heading.is_empty() {
            return Err(IndexError::EmptyHeading {
                document: self.document.name.clone(),
                line: line_num,
            });
        }

        self.headings.truncate(depth);
        self.headings.push(heading.to_string());

        if !self.declared.insert(self.headings.clone()) {
            return Err(IndexError::DuplicateHeading {
                document: self.document.name.clone(),
                line: line_num,
                heading: heading.to_string(),
            });
        }
        Ok(())
    }

    fn current_id(&self) -> CardId {
        CardId::new(self.headings.clone())
    }

    fn store(&mut self, text: &str) {
        let id = self.current_id();
        let position = match self.positions.get(&id) {
            Some(&position) => position,
            None => {
                self.bodies.push((id.clone(), String::new()));
                self.positions.insert(id, self.bodies.len() - 1);
                self.bodies.len() - 1
            }
        };
        let body = &mut self.bodies[position].1;
        body.push_str(text);
        body.push('\n');
    }

    fn finalize(self) -> Vec<Card> {
        let source = &self.document.path;
        let skipped = &self.skipped;
        self.bodies
            .into_iter()
            .filter(|(id, body)| {
                if skipped.contains(id) {
                    debug!(card = %id, "skipping card marked with skip directive");
                    return false;
                }
                !body.trim().is_empty()
            })
            .map(|(id, body)| Card {
                id,
                body,
                source: source.clone(),
            })
            .collect()
    }
}

enum LineType<'a> {
    Heading { level: usize, text: &'a str },
    Skip,
    Delimiter,
    Text(&'a str),
}

impl<'a> LineType<'a> {
    fn parse(line: &'a str) -> Self {
        if let Some((level, text)) = parse_heading(line) {
            LineType::Heading { level, text }
        } else if is_skip_directive(line) {
            LineType::Skip
        } else if line.starts_with("---") {
            LineType::Delimiter
        } else {
            LineType::Text(line)
        }
    }
}

/// `#`-run followed by a space. Returns the number of `#` and the rest of the line.
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let level = line.len() - line.trim_start_matches('#').len();
    if level == 0 {
        return None;
    }
    let text = line[level..].strip_prefix(' ')?;
    Some((level, text))
}

/// `<!-- flashcards: skip -->`, whitespace-insensitive.
fn is_skip_directive(line: &str) -> bool {
    let Some(inner) = line
        .trim()
        .strip_prefix("<!--")
        .and_then(|rest| rest.strip_suffix("-->"))
    else {
        return false;
    };
    let Some(rest) = inner.trim_start().strip_prefix("flashcards") else {
        return false;
    };
    let Some(rest) = rest.trim_start().strip_prefix(':') else {
        return false;
    };
    rest.trim() == "skip"
}
