use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::core::card::Card;
use crate::core::types::{CardId, Rarity};
use crate::parsing::csv::{parse_catalog_file, parse_catalog_text};
use crate::parsing::ParseError;

/// The card catalog with lookup indexes
#[derive(Debug, Clone)]
pub struct CardCatalog {
    /// All cards in catalog order
    pub cards: Vec<Card>,

    /// Index: internal card ID -> index in cards vec
    id_to_index: HashMap<CardId, usize>,

    /// Internal IDs of every SR/SSR card
    high_rarity: HashSet<CardId>,
}

impl CardCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            id_to_index: HashMap::new(),
            high_rarity: HashSet::new(),
        }
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut catalog = Self::new();
        for card in cards {
            catalog.add_card(card);
        }
        catalog
    }

    /// Load catalog from a CSV file
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, ParseError> {
        Ok(Self::from_cards(parse_catalog_file(path)?))
    }

    /// Parse catalog from CSV text
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the CSV header is missing or invalid.
    pub fn from_csv(text: &str) -> Result<Self, ParseError> {
        Ok(Self::from_cards(parse_catalog_text(text)?))
    }

    /// Add a card to the catalog. A later card with the same ID replaces the
    /// earlier one in lookups.
    pub fn add_card(&mut self, card: Card) {
        let index = self.cards.len();

        if self.id_to_index.insert(card.id, index).is_some() {
            tracing::warn!("Duplicate catalog ID {}", card.id);
        }

        if card.is_high_rarity() {
            self.high_rarity.insert(card.id);
        } else {
            self.high_rarity.remove(&card.id);
        }

        self.cards.push(card);
    }

    /// Get a card by internal ID
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.id_to_index.get(&id).map(|&idx| &self.cards[idx])
    }

    /// True if `id` (internal) is an SR or SSR card
    pub fn is_high_rarity(&self, id: CardId) -> bool {
        self.high_rarity.contains(&id)
    }

    /// Internal IDs of every SR/SSR card
    pub fn high_rarity_ids(&self) -> &HashSet<CardId> {
        &self.high_rarity
    }

    /// Cards of a single rarity, in catalog order
    pub fn by_rarity(&self, rarity: Rarity) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |c| c.rarity == rarity)
    }

    /// Number of cards in catalog
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for CardCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CardCatalog {
        CardCatalog::from_csv("id,rarity,title\n1,4,A\n2,3,B\n3,1,C\n4,2,D\n").unwrap()
    }

    #[test]
    fn test_catalog_from_csv() {
        let catalog = sample();
        assert_eq!(catalog.len(), 4);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.get(CardId(2)).unwrap().title, "B");
        assert!(catalog.get(CardId(99)).is_none());
    }

    #[test]
    fn test_high_rarity_index() {
        let catalog = sample();
        assert!(catalog.is_high_rarity(CardId(1)));
        assert!(catalog.is_high_rarity(CardId(2)));
        assert!(!catalog.is_high_rarity(CardId(3)));
        assert!(!catalog.is_high_rarity(CardId(4)));
        assert_eq!(catalog.high_rarity_ids().len(), 2);
    }

    #[test]
    fn test_by_rarity() {
        let catalog = sample();
        let srs: Vec<_> = catalog.by_rarity(Rarity::Sr).map(|c| c.id).collect();
        assert_eq!(srs, vec![CardId(2)]);
    }

    #[test]
    fn test_duplicate_id_uses_latest() {
        let mut catalog = sample();
        catalog.add_card(Card::new(1, Rarity::R, "A2"));
        assert_eq!(catalog.get(CardId(1)).unwrap().title, "A2");
        assert!(!catalog.is_high_rarity(CardId(1)));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = CardCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.high_rarity_ids().is_empty());
    }
}
