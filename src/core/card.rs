use serde::{Deserialize, Serialize};

use crate::core::id::denormalize;
use crate::core::types::{CardId, Rarity};

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Catalog (internal) ID
    pub id: CardId,

    pub rarity: Rarity,

    /// Raw title, usually `【card title】character name`
    pub title: String,

    /// Optional series/event tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

impl Card {
    pub fn new(id: impl Into<CardId>, rarity: Rarity, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rarity,
            title: title.into(),
            series: None,
        }
    }

    #[must_use]
    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }

    /// ID in the player-facing numbering
    #[must_use]
    pub fn external_id(&self) -> CardId {
        denormalize(self.id)
    }

    #[must_use]
    pub fn is_high_rarity(&self) -> bool {
        self.rarity.is_high()
    }
}
