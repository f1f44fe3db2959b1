//! Turning match results into displayable cards.
//!
//! - [`caption`]: title splitting, character names, icon paths
//! - [`results`]: per-match card lists with ownership highlighting
//!
//! Every rendered card carries its player-facing ID, its icon path and whether
//! it is owned. Unowned cards get a highlight colour; strict and relaxed
//! results use different colours so stretch matches stand out.

pub mod caption;
pub mod results;
