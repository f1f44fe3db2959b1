//! Card picker state: which cards are listed and which are selected.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::store::CardCatalog;
use crate::core::card::Card;
use crate::core::id::denormalize;
use crate::core::types::{CardId, Rarity};

/// Which cards the picker lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewFilter {
    #[default]
    ShowingAll,
    /// Only SR and SSR cards
    ShowingHighRarityOnly,
}

/// Picker state machine.
///
/// Selection is kept in internal numbering and survives filter changes;
/// cards hidden by the filter stay selected.
#[derive(Debug, Clone, Default)]
pub struct CardListView {
    filter: ViewFilter,
    selected: BTreeSet<CardId>,
}

impl CardListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> ViewFilter {
        self.filter
    }

    pub fn toggle_filter(&mut self) {
        self.filter = match self.filter {
            ViewFilter::ShowingAll => ViewFilter::ShowingHighRarityOnly,
            ViewFilter::ShowingHighRarityOnly => ViewFilter::ShowingAll,
        };
    }

    fn shows(&self, card: &Card) -> bool {
        match self.filter {
            ViewFilter::ShowingAll => true,
            ViewFilter::ShowingHighRarityOnly => card.is_high_rarity(),
        }
    }

    /// Listed cards, newest (highest ID) first
    pub fn visible_cards<'a>(&self, catalog: &'a CardCatalog) -> Vec<&'a Card> {
        let mut cards: Vec<&Card> = catalog.cards.iter().filter(|c| self.shows(c)).collect();
        cards.sort_by(|a, b| b.id.cmp(&a.id));
        cards
    }

    /// Flip the selection of one card (internal ID)
    pub fn toggle(&mut self, id: CardId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn select(&mut self, id: CardId) {
        self.selected.insert(id);
    }

    pub fn is_selected(&self, id: CardId) -> bool {
        self.selected.contains(&id)
    }

    /// Select every visible SR card, or deselect them all if every one is
    /// already selected. Returns true if the cards ended up selected.
    pub fn toggle_all_sr(&mut self, catalog: &CardCatalog) -> bool {
        let srs: Vec<CardId> = catalog
            .by_rarity(Rarity::Sr)
            .filter(|c| self.shows(c))
            .map(|c| c.id)
            .collect();

        let all_selected = srs.iter().all(|id| self.selected.contains(id));
        for id in srs {
            if all_selected {
                self.selected.remove(&id);
            } else {
                self.selected.insert(id);
            }
        }
        !all_selected
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn selected(&self) -> &BTreeSet<CardId> {
        &self.selected
    }

    /// Selection in external numbering, joined with commas; ready to paste
    /// back as calculation input.
    pub fn selected_id_string(&self) -> String {
        self.selected
            .iter()
            .map(|&id| denormalize(id).to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CardCatalog {
        CardCatalog::from_csv("id,rarity,title\n1,4,A\n2,3,B\n3,1,C\n5,3,E\n400,4,Z\n").unwrap()
    }

    fn ids(cards: &[&Card]) -> Vec<u32> {
        cards.iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn test_visible_cards_sorted_descending() {
        let view = CardListView::new();
        assert_eq!(ids(&view.visible_cards(&catalog())), vec![400, 5, 3, 2, 1]);
    }

    #[test]
    fn test_filter_transitions() {
        let catalog = catalog();
        let mut view = CardListView::new();
        assert_eq!(view.filter(), ViewFilter::ShowingAll);

        view.toggle_filter();
        assert_eq!(view.filter(), ViewFilter::ShowingHighRarityOnly);
        assert_eq!(ids(&view.visible_cards(&catalog)), vec![400, 5, 2, 1]);

        view.toggle_filter();
        assert_eq!(view.filter(), ViewFilter::ShowingAll);
    }

    #[test]
    fn test_selection_survives_filter_change() {
        let catalog = catalog();
        let mut view = CardListView::new();
        view.toggle(CardId(3));
        view.toggle_filter();
        assert!(view.is_selected(CardId(3)));
        assert!(!ids(&view.visible_cards(&catalog)).contains(&3));
        view.toggle_filter();
        assert!(view.is_selected(CardId(3)));
    }

    #[test]
    fn test_toggle_single() {
        let mut view = CardListView::new();
        view.toggle(CardId(2));
        assert!(view.is_selected(CardId(2)));
        view.toggle(CardId(2));
        assert!(!view.is_selected(CardId(2)));
    }

    #[test]
    fn test_toggle_all_sr() {
        let catalog = catalog();
        let mut view = CardListView::new();

        assert!(view.toggle_all_sr(&catalog));
        assert_eq!(view.selected().len(), 2);
        assert!(view.is_selected(CardId(2)) && view.is_selected(CardId(5)));

        assert!(!view.toggle_all_sr(&catalog));
        assert!(view.selected().is_empty());
    }

    #[test]
    fn test_toggle_all_sr_partial_selects_rest() {
        let catalog = catalog();
        let mut view = CardListView::new();
        view.toggle(CardId(2));
        assert!(view.toggle_all_sr(&catalog));
        assert!(view.is_selected(CardId(5)));
        assert!(view.is_selected(CardId(2)));
    }

    #[test]
    fn test_selected_id_string_uses_external_numbering() {
        let mut view = CardListView::new();
        view.select(CardId(400));
        view.select(CardId(1));
        view.select(CardId(2));
        assert_eq!(view.selected_id_string(), "1,2,381");

        view.clear();
        assert_eq!(view.selected_id_string(), "");
    }
}
