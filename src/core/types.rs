use serde::{Deserialize, Serialize};

/// Identifier of a card.
///
/// The same integer type carries both numbering spaces; see
/// [`crate::core::id`] for the mapping between the player-facing (external)
/// numbering and the catalog's internal numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Card rarity tier as stored in the catalog's `rarity` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    N,
    R,
    Sr,
    Ssr,
}

impl Rarity {
    /// Parse the numeric rarity code (1-4). Surrounding whitespace is ignored.
    #[must_use]
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim() {
            "1" => Some(Self::N),
            "2" => Some(Self::R),
            "3" => Some(Self::Sr),
            "4" => Some(Self::Ssr),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::N => 1,
            Self::R => 2,
            Self::Sr => 3,
            Self::Ssr => 4,
        }
    }

    /// SR and SSR are the only rarities that take part in deck building
    #[must_use]
    pub fn is_high(self) -> bool {
        matches!(self, Self::Sr | Self::Ssr)
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::N => write!(f, "N"),
            Self::R => write!(f, "R"),
            Self::Sr => write!(f, "SR"),
            Self::Ssr => write!(f, "SSR"),
        }
    }
}

/// How strictly a solution matched the owned set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Support owned and at most one quad card missing
    Strong,
    /// Whole quad owned, support must be borrowed
    Borrow,
    /// Support owned, quad only partially owned (relaxed pass)
    RelaxedStrong,
    /// Support not owned, quad partially owned (relaxed pass)
    RelaxedBorrow,
    /// Support owned, one quad card short of `Strong`
    NearStrong,
    /// Support not owned, one quad card short of `Borrow`
    NearBorrow,
}

impl MatchTier {
    #[must_use]
    pub fn is_relaxed(self) -> bool {
        matches!(self, Self::RelaxedStrong | Self::RelaxedBorrow)
    }

    #[must_use]
    pub fn is_near_miss(self) -> bool {
        matches!(self, Self::NearStrong | Self::NearBorrow)
    }

    #[must_use]
    pub fn is_borrow(self) -> bool {
        matches!(self, Self::Borrow | Self::RelaxedBorrow | Self::NearBorrow)
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strong => write!(f, "strong"),
            Self::Borrow => write!(f, "borrow"),
            Self::RelaxedStrong => write!(f, "relaxed-strong"),
            Self::RelaxedBorrow => write!(f, "relaxed-borrow"),
            Self::NearStrong => write!(f, "near-strong"),
            Self::NearBorrow => write!(f, "near-borrow"),
        }
    }
}

/// Which sweep over the solution table produced the results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPass {
    Strict,
    Relaxed,
    /// Decks one card short of buildable
    NearMiss,
    /// Neither pass produced anything
    None,
}

impl std::fmt::Display for MatchPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Relaxed => write!(f, "relaxed"),
            Self::NearMiss => write!(f, "near-miss"),
            Self::None => write!(f, "none"),
        }
    }
}
