//! Parsers that adapt raw data files into typed catalog and solution records.
//!
//! - **Card catalog CSV**: one row per card with `id`, `rarity`, `title` and
//!   an optional `series` column, located by header name
//! - **Solution tables (JSON)**: the flat list/map of solution objects, and the
//!   legacy nested pair keyed by colour pair then tag pair
//!
//! Field-name differences between data revisions (`card0s`/`set`/`dset`,
//! `tags`/`set_tag`/`dset_tag`, ...) are resolved here so that the matcher only
//! ever sees canonical [`Solution`](crate::core::solution::Solution) values.
//!
//! ## Example
//!
//! ```rust
//! use deck_solver::parsing::csv::parse_catalog_text;
//! use deck_solver::parsing::solutions::parse_flat_solutions;
//!
//! let cards = parse_catalog_text("id,rarity,title\n1,4,A\n2,3,B\n").unwrap();
//! assert_eq!(cards.len(), 2);
//!
//! let table = parse_flat_solutions(r#"[{"quad":[1,2,3,4],"card0s":[5]}]"#).unwrap();
//! assert_eq!(table.len(), 1);
//! ```

use thiserror::Error;

pub mod csv;
pub mod solutions;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid CSV: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Too many records: exceeds maximum of {0}")]
    TooManyRecords(usize),
}

/// Maximum number of records accepted from one data file (DOS protection)
pub const MAX_RECORDS: usize = 500_000;
