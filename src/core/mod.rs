//! Core data types for deck matching.
//!
//! - [`CardId`]: card identifier, used for both numbering spaces
//! - [`Card`]: a catalog entry with rarity and title
//! - [`Solution`]: a precomputed deck (four-card quad plus support set)
//! - [`Rarity`], [`MatchTier`], [`MatchPass`]: classification types
//!
//! ## Card numbering
//!
//! Player input and display use the *external* numbering. The catalog and the
//! solution tables use the *internal* numbering, which differs after a block of
//! cards was inserted at ID 337:
//!
//! | External | Internal |
//! |----------|----------|
//! | 1..=336  | 1..=336  |
//! | -        | 337..=355 (inserted) |
//! | 337..    | 356..    |
//!
//! See [`id`] for the conversions.
//!
//! [`CardId`]: types::CardId
//! [`Card`]: card::Card
//! [`Solution`]: solution::Solution
//! [`Rarity`]: types::Rarity
//! [`MatchTier`]: types::MatchTier
//! [`MatchPass`]: types::MatchPass

pub mod card;
pub mod id;
pub mod solution;
pub mod types;
