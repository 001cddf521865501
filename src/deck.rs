//! Deck list loading
//!
//! Deck files use the plain text format: one `"4 Dark Ritual"` entry
//! per line, with blank lines and `#` comments ignored.

use crate::core::Card;
use crate::error::{Result, SimError};
use std::fs;
use std::path::Path;

/// One line of a deck list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckEntry {
    pub card: Card,
    pub count: u8,
}

/// A parsed deck list
#[derive(Debug, Clone, Default)]
pub struct DeckList {
    pub entries: Vec<DeckEntry>,
}

impl DeckList {
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<DeckList> {
        let mut entries = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (count_str, name) = line.split_once(' ').ok_or_else(|| {
                SimError::InvalidDeckFormat(format!("expected \"<count> <card name>\": {line}"))
            })?;
            let count: u8 = count_str.parse().map_err(|_| {
                SimError::InvalidDeckFormat(format!("bad count in line: {line}"))
            })?;
            let card = Card::from_name(name)
                .ok_or_else(|| SimError::UnknownCard(name.trim().to_string()))?;
            entries.push(DeckEntry { card, count });
        }
        if entries.is_empty() {
            return Err(SimError::InvalidDeckFormat("empty deck".to_string()));
        }
        Ok(DeckList { entries })
    }

    pub fn total_cards(&self) -> usize {
        self.entries.iter().map(|e| e.count as usize).sum()
    }

    /// Flatten into the 60 individual cards a trial shuffles
    pub fn expand(&self) -> Result<Vec<Card>> {
        let total = self.total_cards();
        if total != 60 {
            return Err(SimError::InvalidDeckSize(total));
        }
        let mut cards = Vec::with_capacity(total);
        for entry in &self.entries {
            for _ in 0..entry.count {
                cards.push(entry.card);
            }
        }
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deck() {
        let content = "\
# storm list
4 Dark Ritual
4 Necrodominance

1 Tendrils of Agony
";
        let deck = DeckList::parse(content).unwrap();
        assert_eq!(deck.entries.len(), 3);
        assert_eq!(deck.total_cards(), 9);
        assert_eq!(
            deck.entries[0],
            DeckEntry {
                card: Card::DarkRitual,
                count: 4
            }
        );
    }

    #[test]
    fn test_parse_unknown_card() {
        assert!(matches!(
            DeckList::parse("4 Black Lotus"),
            Err(SimError::UnknownCard(_))
        ));
    }

    #[test]
    fn test_parse_bad_line() {
        assert!(matches!(
            DeckList::parse("DarkRitual"),
            Err(SimError::InvalidDeckFormat(_))
        ));
    }

    #[test]
    fn test_expand_enforces_deck_size() {
        let deck = DeckList::parse("4 Dark Ritual").unwrap();
        assert!(matches!(deck.expand(), Err(SimError::InvalidDeckSize(4))));

        let deck = DeckList::parse("30 Dark Ritual\n30 Duress").unwrap();
        assert_eq!(deck.expand().unwrap().len(), 60);
    }
}
