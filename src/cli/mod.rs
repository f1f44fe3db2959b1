//! Command-line interface for deck-solver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **match**: Find deck solutions the given cards can build
//! - **cards**: List the card catalog and build a copyable ID selection
//! - **serve**: Start the interactive web interface
//!
//! ## Usage
//!
//! ```text
//! # Match owned cards against the published solution table
//! deck-solver match 12,45,381,400
//!
//! # Use local data files and JSON output
//! deck-solver match 12,45,381 --catalog cards.csv --solutions solutions.json --format json
//!
//! # Select every SR card and print the ID string
//! deck-solver cards --high-rarity-only --select-all-sr
//!
//! # Start web UI
//! deck-solver serve --port 8080 --open
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::catalog::source::{
    DataSource, SolutionSource, SourceConfig, DEFAULT_CATALOG_URL, DEFAULT_QUADS_URL,
    DEFAULT_SUPPORT_URL,
};
use crate::render::caption::DEFAULT_ICON_BASE;

pub mod cards;
pub mod solve;

#[derive(Parser)]
#[command(name = "deck-solver")]
#[command(version)]
#[command(about = "Find deck solutions buildable from an owned card collection")]
#[command(
    long_about = "deck-solver matches the SR/SSR cards you own against a table of precomputed deck solutions.\n\nEach solution is four core cards plus a set of interchangeable support cards. Results are:\n- Strong matches: a support card is owned and at most one core card is missing\n- Borrow matches: all four core cards are owned and a support card can be borrowed\n- Relaxed matches, shown only when nothing else matches"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match owned cards against the solution table
    #[command(alias = "solve")]
    Match(solve::MatchArgs),

    /// List catalog cards and build an ID selection
    Cards(cards::CardsArgs),

    /// Start the web server
    Serve(ServeArgs),
}

/// Where catalog and solution data are loaded from
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// Card catalog CSV (path or http(s) URL)
    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    pub catalog: DataSource,

    /// Flat solution table JSON (path or URL); overrides --support-sets/--quads
    #[arg(long, conflicts_with_all = ["support_sets", "quads"])]
    pub solutions: Option<DataSource>,

    /// Nested support-set document (path or URL)
    #[arg(long, default_value = DEFAULT_SUPPORT_URL)]
    pub support_sets: DataSource,

    /// Nested quad document (path or URL)
    #[arg(long, default_value = DEFAULT_QUADS_URL)]
    pub quads: DataSource,

    /// Timeout in seconds for each data load
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout: u64,
}

impl SourceArgs {
    pub fn to_config(&self) -> SourceConfig {
        let solutions = match &self.solutions {
            Some(flat) => SolutionSource::Flat(flat.clone()),
            None => SolutionSource::Nested {
                support: self.support_sets.clone(),
                quads: self.quads.clone(),
            },
        };
        SourceConfig {
            catalog: self.catalog.clone(),
            solutions,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// URL prefix the browser loads card icons from
    #[arg(long, default_value = DEFAULT_ICON_BASE)]
    pub icon_base: String,

    /// Serve card icons from this local directory; overrides --icon-base
    #[arg(long)]
    pub icon_dir: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_source_args_default_to_nested_published_data() {
        let cli = Cli::parse_from(["deck-solver", "match", "1,2"]);
        let Commands::Match(args) = cli.command else {
            panic!("expected match command");
        };
        let config = args.source.to_config();
        assert_eq!(config.catalog, DataSource::url(DEFAULT_CATALOG_URL));
        assert!(matches!(config.solutions, SolutionSource::Nested { .. }));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_flat_solutions_override() {
        let cli = Cli::parse_from([
            "deck-solver",
            "solve",
            "1,2",
            "--catalog",
            "cards.csv",
            "--solutions",
            "solutions.json",
            "--timeout",
            "5",
        ]);
        let Commands::Match(args) = cli.command else {
            panic!("expected match command");
        };
        let config = args.source.to_config();
        assert_eq!(config.catalog, DataSource::path("cards.csv"));
        assert_eq!(
            config.solutions,
            SolutionSource::Flat(DataSource::path("solutions.json"))
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_serve_icon_options() {
        let cli = Cli::parse_from(["deck-solver", "serve"]);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.icon_base, DEFAULT_ICON_BASE);
        assert!(args.icon_dir.is_none());

        let cli = Cli::parse_from(["deck-solver", "serve", "--icon-dir", "icons"]);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.icon_dir, Some(PathBuf::from("icons")));
    }
}
