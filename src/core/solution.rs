use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::CardId;

/// Number of cards in a solution's fixed core
pub const QUAD_SIZE: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolutionError {
    #[error("quad must contain exactly {QUAD_SIZE} cards, found {0}")]
    BadQuadLength(usize),

    #[error("support set is empty")]
    EmptySupport,
}

/// A precomputed deck: a fixed four-card core plus one card from the support set.
///
/// All IDs use the catalog's internal numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SolutionRecord")]
pub struct Solution {
    pub quad: [CardId; QUAD_SIZE],

    /// Any one of these fills the remaining slot
    support_set: Vec<CardId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
}

/// Unchecked serialized form of [`Solution`]
#[derive(Deserialize)]
struct SolutionRecord {
    quad: [CardId; QUAD_SIZE],
    support_set: Vec<CardId>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    colors: Vec<String>,
}

impl TryFrom<SolutionRecord> for Solution {
    type Error = SolutionError;

    fn try_from(record: SolutionRecord) -> Result<Self, Self::Error> {
        Ok(Self::new(record.quad, record.support_set)?
            .with_tags(record.tags)
            .with_colors(record.colors))
    }
}

impl Solution {
    /// Build a solution, rejecting an empty support set.
    ///
    /// # Errors
    ///
    /// Returns `SolutionError::EmptySupport` if `support_set` is empty.
    pub fn new(quad: [CardId; QUAD_SIZE], support_set: Vec<CardId>) -> Result<Self, SolutionError> {
        if support_set.is_empty() {
            return Err(SolutionError::EmptySupport);
        }
        Ok(Self {
            quad,
            support_set,
            tags: Vec::new(),
            colors: Vec::new(),
        })
    }

    /// Build a solution from loosely-typed lists.
    ///
    /// # Errors
    ///
    /// Returns `SolutionError::BadQuadLength` unless `quad` has exactly four
    /// entries, or `SolutionError::EmptySupport` for an empty support set.
    pub fn from_lists(quad: &[CardId], support_set: Vec<CardId>) -> Result<Self, SolutionError> {
        let quad: [CardId; QUAD_SIZE] = quad
            .try_into()
            .map_err(|_| SolutionError::BadQuadLength(quad.len()))?;
        Self::new(quad, support_set)
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: Vec<String>) -> Self {
        self.colors = colors;
        self
    }

    /// Never empty
    #[must_use]
    pub fn support_set(&self) -> &[CardId] {
        &self.support_set
    }
}
