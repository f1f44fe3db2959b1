//! Ownership filtering and deck-solution matching.
//!
//! - [`ownership::OwnedSet`]: the player's usable cards (normalized, SR/SSR only)
//! - [`engine::MatchingEngine`]: classifies every solution against the owned set
//!
//! ## Matching Algorithm
//!
//! For each solution the engine counts the owned quad cards and checks whether
//! any support card is owned. Two passes exist:
//!
//! | Pass    | Support owned      | Support not owned  |
//! |---------|--------------------|--------------------|
//! | Strict  | quad ≥ 3: strong   | quad = 4: borrow   |
//! | Relaxed | quad ≥ 1           | quad ≥ 3           |
//!
//! The relaxed pass runs only when the strict pass finds nothing at all, so
//! strict and relaxed results never mix. Results keep solution-table order.
//! The thresholds live in [`engine::MatchingConfig`].
//!
//! ## Example
//!
//! ```rust
//! use deck_solver::catalog::store::CardCatalog;
//! use deck_solver::catalog::table::SolutionTable;
//! use deck_solver::core::solution::Solution;
//! use deck_solver::matching::engine::MatchingEngine;
//! use deck_solver::matching::ownership::OwnedSet;
//! use deck_solver::{CardId, MatchTier};
//!
//! let catalog = CardCatalog::from_csv(
//!     "id,rarity,title\n1,4,A\n2,3,B\n3,4,C\n4,3,D\n5,3,E\n",
//! ).unwrap();
//! let quad = [CardId(1), CardId(2), CardId(3), CardId(4)];
//! let table = SolutionTable::from_solutions(vec![Solution::new(quad, vec![CardId(5)]).unwrap()]);
//!
//! let owned = OwnedSet::from_raw(&[CardId(1), CardId(2), CardId(3), CardId(5)], &catalog);
//! let outcome = MatchingEngine::new(&table).find_matches(&owned);
//! assert_eq!(outcome.results[0].tier, MatchTier::Strong);
//! ```

pub mod engine;
pub mod ownership;
