//! # deck-solver
//!
//! A library for finding which precomputed deck solutions a player can build
//! from the cards they own.
//!
//! A deck solution is four core cards (the *quad*) plus a set of
//! interchangeable *support* cards. Given a list of owned card IDs,
//! `deck-solver` keeps the usable SR/SSR cards and classifies every solution:
//!
//! - **Strong**: a support card is owned and at most one quad card is missing
//! - **Borrow**: the whole quad is owned and the support card can be borrowed
//! - **Relaxed** variants with lower thresholds, surfaced only when nothing
//!   else matches
//!
//! Card IDs come in two numberings. Players use the external numbering; the
//! catalog and solution table use the internal one, which leaves a gap for
//! cards inserted later (see [`core::id`]).
//!
//! ## Example
//!
//! ```rust
//! use deck_solver::{CardCatalog, CardId, MatchPass, MatchingEngine, OwnedSet, Solution, SolutionTable};
//!
//! let catalog = CardCatalog::from_csv(
//!     "id,rarity,title\n1,4,【A】オズ\n2,3,B\n3,4,C\n4,3,D\n5,3,E\n",
//! ).unwrap();
//!
//! let quad = [CardId(1), CardId(2), CardId(3), CardId(4)];
//! let table = SolutionTable::from_solutions(vec![Solution::new(quad, vec![CardId(5)]).unwrap()]);
//!
//! // Parsed from user input such as "1,2,3,4"
//! let owned = OwnedSet::from_raw(&[CardId(1), CardId(2), CardId(3), CardId(4)], &catalog);
//! let outcome = MatchingEngine::new(&table).find_matches(&owned);
//!
//! assert_eq!(outcome.pass, MatchPass::Strict);
//! for m in &outcome.results {
//!     println!("{}: {}/4 core cards owned", m.tier, m.quad_owned_count);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Card catalog, solution table, data loading and the card picker
//! - [`core`]: Card IDs, rarities, cards and solutions
//! - [`matching`]: Ownership filter and matching engine
//! - [`parsing`]: CSV catalog and JSON solution-table parsers
//! - [`render`]: Captions, icon paths and highlighted result cards
//! - [`session`]: Calculation pipeline and supersession
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: Web server for browser-based matching

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod render;
pub mod session;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use crate::catalog::store::CardCatalog;
pub use crate::catalog::table::SolutionTable;
pub use crate::core::card::Card;
pub use crate::core::solution::Solution;
pub use crate::core::types::*;
pub use crate::matching::engine::{MatchOutcome, MatchResult, MatchingConfig, MatchingEngine};
pub use crate::matching::ownership::OwnedSet;
