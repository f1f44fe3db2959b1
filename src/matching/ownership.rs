use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::store::CardCatalog;
use crate::core::id::{denormalize, normalize};
use crate::core::types::CardId;

/// Cards the player effectively owns for deck building: SR/SSR catalog cards,
/// in internal numbering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OwnedSet(BTreeSet<CardId>);

impl OwnedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the owned set from raw player input (external numbering).
    ///
    /// Each ID is normalized, then kept only if it is an SR/SSR card in the
    /// catalog. Unknown and low-rarity IDs are dropped silently; duplicates
    /// collapse.
    pub fn from_raw(raw_ids: &[CardId], catalog: &CardCatalog) -> Self {
        Self::retain_high_rarity(raw_ids.iter().map(|&id| normalize(id)), catalog)
    }

    /// Keep only SR/SSR catalog cards from IDs already in internal numbering.
    pub fn retain_high_rarity(
        internal_ids: impl IntoIterator<Item = CardId>,
        catalog: &CardCatalog,
    ) -> Self {
        Self(
            internal_ids
                .into_iter()
                .filter(|&id| catalog.is_high_rarity(id))
                .collect(),
        )
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.0.contains(&id)
    }

    /// Internal IDs in ascending order
    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.0.iter().copied()
    }

    /// IDs in the player-facing numbering, ascending by internal ID
    pub fn external_ids(&self) -> Vec<CardId> {
        self.iter().map(denormalize).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<CardId> for OwnedSet {
    /// Collect internal IDs as-is, without catalog filtering
    fn from_iter<I: IntoIterator<Item = CardId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Normalize raw IDs and intersect them with the catalog's SR/SSR cards
pub fn filter_owned(raw_ids: &[CardId], catalog: &CardCatalog) -> OwnedSet {
    OwnedSet::from_raw(raw_ids, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[u32]) -> Vec<CardId> {
        v.iter().copied().map(CardId).collect()
    }

    fn small_catalog() -> CardCatalog {
        CardCatalog::from_csv("id,rarity,title\n1,4,A\n2,3,B\n3,1,C\n").unwrap()
    }

    #[test]
    fn test_low_rarity_excluded() {
        let owned = filter_owned(&ids(&[1, 2, 3]), &small_catalog());
        assert_eq!(owned.iter().collect::<Vec<_>>(), ids(&[1, 2]));
    }

    #[test]
    fn test_unknown_ids_dropped_and_duplicates_collapse() {
        let owned = filter_owned(&ids(&[2, 2, 99, 1, 2]), &small_catalog());
        assert_eq!(owned.len(), 2);
    }

    #[test]
    fn test_ids_are_normalized() {
        // Internal 356 is external 337; internal 337 is an inserted card
        let catalog =
            CardCatalog::from_csv("id,rarity,title\n337,4,Inserted\n356,4,Shifted\n").unwrap();

        let owned = filter_owned(&ids(&[337]), &catalog);
        assert_eq!(owned.iter().collect::<Vec<_>>(), ids(&[356]));
        assert_eq!(owned.external_ids(), ids(&[337]));
    }

    #[test]
    fn test_filter_is_subset_of_normalized_input() {
        let catalog =
            CardCatalog::from_csv("id,rarity,title\n1,4,A\n356,3,B\n400,2,C\n500,4,D\n").unwrap();
        let raw = ids(&[1, 337, 381, 481, 2, 1000]);
        let normalized: BTreeSet<CardId> = raw.iter().map(|&id| normalize(id)).collect();

        let owned = filter_owned(&raw, &catalog);
        assert!(owned.iter().all(|id| normalized.contains(&id)));
        assert_eq!(owned.iter().collect::<Vec<_>>(), ids(&[1, 356, 500]));
    }

    #[test]
    fn test_retain_high_rarity_idempotent() {
        let catalog =
            CardCatalog::from_csv("id,rarity,title\n1,4,A\n356,3,B\n400,2,C\n").unwrap();
        let once = OwnedSet::retain_high_rarity(ids(&[1, 356, 400, 7]), &catalog);
        let twice = OwnedSet::retain_high_rarity(once.iter(), &catalog);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_owned(&[], &small_catalog()).is_empty());
    }
}
