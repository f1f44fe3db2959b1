//! Mapping between player-facing card IDs and catalog IDs.
//!
//! A block of expansion cards was inserted into the catalog at position
//! [`INSERTION_POINT`], shifting every later catalog ID by [`INSERTION_OFFSET`].
//! Player input and on-screen labels keep using the old numbering.

use crate::core::types::CardId;

/// First catalog position occupied by the inserted block
pub const INSERTION_POINT: u32 = 337;

/// Number of inserted cards
pub const INSERTION_OFFSET: u32 = 19;

/// Map an external (player-facing) ID to the catalog's internal numbering.
///
/// Apply exactly once per ID.
///
/// ```
/// use deck_solver::core::id::normalize;
/// use deck_solver::CardId;
///
/// assert_eq!(normalize(CardId(336)), CardId(336));
/// assert_eq!(normalize(CardId(337)), CardId(356));
/// ```
#[must_use]
pub fn normalize(external: CardId) -> CardId {
    if external.0 >= INSERTION_POINT {
        CardId(external.0.saturating_add(INSERTION_OFFSET))
    } else {
        external
    }
}

/// Map an internal catalog ID back to the external numbering.
///
/// IDs inside the inserted block have no external counterpart and are
/// returned unchanged, as are all IDs below the insertion point.
#[must_use]
pub fn denormalize(internal: CardId) -> CardId {
    if internal.0 >= INSERTION_POINT + INSERTION_OFFSET {
        CardId(internal.0 - INSERTION_OFFSET)
    } else {
        internal
    }
}

/// True for internal IDs that belong to the inserted block
#[must_use]
pub fn is_inserted(internal: CardId) -> bool {
    (INSERTION_POINT..INSERTION_POINT + INSERTION_OFFSET).contains(&internal.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_below_threshold_is_identity() {
        for e in [0, 1, 100, 336] {
            assert_eq!(normalize(CardId(e)), CardId(e));
            assert_eq!(denormalize(normalize(CardId(e))), CardId(e));
        }
    }

    #[test]
    fn test_normalize_shifts_from_threshold() {
        for e in [337, 338, 500, 10_000] {
            assert_eq!(normalize(CardId(e)), CardId(e + 19));
            assert_eq!(denormalize(normalize(CardId(e))), CardId(e));
        }
    }

    #[test]
    fn test_normalize_never_lands_in_inserted_block() {
        for e in 0..1000 {
            assert!(!is_inserted(normalize(CardId(e))), "external {e}");
        }
    }

    #[test]
    fn test_inserted_block_bounds() {
        assert!(!is_inserted(CardId(336)));
        assert!(is_inserted(CardId(337)));
        assert!(is_inserted(CardId(355)));
        assert!(!is_inserted(CardId(356)));
        assert_eq!(denormalize(CardId(355)), CardId(355));
        assert_eq!(denormalize(CardId(356)), CardId(337));
    }

    #[test]
    fn test_normalize_saturates() {
        assert_eq!(normalize(CardId(u32::MAX)), CardId(u32::MAX));
    }
}
