//! Card catalog and solution table storage.
//!
//! Both data sets are loaded at runtime, once per calculation, from local
//! files or HTTP(S) URLs:
//!
//! - [`store::CardCatalog`]: cards indexed by internal ID, with the SR/SSR subset
//! - [`table::SolutionTable`]: the ordered list of precomputed deck solutions
//! - [`source::DataLoader`]: bounded-time loading of both
//! - [`view::CardListView`]: picker state for browsing and selecting cards
//!
//! ## Example
//!
//! ```rust,no_run
//! use deck_solver::catalog::source::{DataLoader, SourceConfig};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let loader = DataLoader::new(SourceConfig::default())?;
//! let (catalog, solutions) = loader.load_all().await?;
//! println!("{} cards, {} solutions", catalog.len(), solutions.len());
//! # Ok(())
//! # }
//! ```

pub mod source;
pub mod store;
pub mod table;
pub mod view;
