//! Calculation pipeline and per-client supersession.
//!
//! A calculation validates the raw input, loads fresh data, filters the
//! owned set and runs the matcher. Each calculation takes a ticket from a
//! [`CalculationTracker`]; if another calculation starts for the same client
//! before the data arrives, the older one is discarded with
//! [`CalcError::Superseded`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::source::{DataLoader, SourceError};
use crate::catalog::store::CardCatalog;
use crate::core::types::CardId;
use crate::matching::engine::{MatchOutcome, MatchingConfig, MatchingEngine};
use crate::matching::ownership::OwnedSet;
use crate::utils::validation::{parse_id_list, InputError};

#[derive(Error, Debug)]
pub enum CalcError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Calculation was superseded by a newer request")]
    Superseded,
}

type Generations = Arc<Mutex<HashMap<String, u64>>>;

fn lock(generations: &Generations) -> MutexGuard<'_, HashMap<String, u64>> {
    generations
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Hands out per-client generation numbers
#[derive(Debug, Clone, Default)]
pub struct CalculationTracker {
    generations: Generations,
    issued: Arc<AtomicU64>,
}

/// Proof of which generation a calculation belongs to.
///
/// Dropping the ticket releases the client's entry unless a newer
/// calculation has taken it over. This also covers calculations whose
/// future is dropped mid-load.
#[derive(Debug)]
pub struct Ticket {
    client: String,
    generation: u64,
    generations: Generations,
}

impl Ticket {
    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        let mut generations = lock(&self.generations);
        if generations.get(&self.client) == Some(&self.generation) {
            generations.remove(&self.client);
        }
    }
}

impl CalculationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a calculation for `client`, superseding any in flight
    pub fn begin(&self, client: &str) -> Ticket {
        let generation = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        lock(&self.generations).insert(client.to_string(), generation);
        Ticket {
            client: client.to_string(),
            generation,
            generations: Arc::clone(&self.generations),
        }
    }

    /// Whether `ticket` is still the newest calculation for its client
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        lock(&self.generations).get(&ticket.client) == Some(&ticket.generation)
    }

    /// Number of clients with a calculation in flight
    pub fn active(&self) -> usize {
        lock(&self.generations).len()
    }
}

/// Everything a calculation produced, ready for rendering
#[derive(Debug)]
pub struct Calculation {
    pub input_ids: Vec<CardId>,
    pub owned: OwnedSet,
    pub outcome: MatchOutcome,
    pub catalog: CardCatalog,
    /// Solution entries skipped while loading
    pub skipped_solutions: usize,
}

/// Runs calculations against a data loader
#[derive(Debug, Clone)]
pub struct Calculator {
    loader: DataLoader,
    matching: MatchingConfig,
    tracker: CalculationTracker,
}

impl Calculator {
    pub fn new(loader: DataLoader, matching: MatchingConfig) -> Self {
        Self {
            loader,
            matching,
            tracker: CalculationTracker::new(),
        }
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    pub fn tracker(&self) -> &CalculationTracker {
        &self.tracker
    }

    /// Run one calculation for `client`.
    ///
    /// # Errors
    ///
    /// Returns `CalcError::Input` before any load if the input is invalid,
    /// `CalcError::Source` if data cannot be loaded, and
    /// `CalcError::Superseded` if a newer calculation for the same client
    /// started while this one was loading.
    pub async fn calculate(&self, client: &str, raw: &str) -> Result<Calculation, CalcError> {
        let input_ids = parse_id_list(raw)?;
        let ticket = self.tracker.begin(client);
        self.run(&ticket, input_ids).await
    }

    /// Run a calculation under an already issued ticket. The client's entry
    /// is released when the caller drops the ticket.
    ///
    /// # Errors
    ///
    /// See [`Calculator::calculate`].
    pub async fn run(&self, ticket: &Ticket, input_ids: Vec<CardId>) -> Result<Calculation, CalcError> {
        debug!(
            "Calculation {} for {}: {} input IDs",
            ticket.generation(),
            ticket.client(),
            input_ids.len()
        );

        let loaded = self.loader.load_all().await;
        if !self.tracker.is_current(ticket) {
            debug!(
                "Calculation {} for {} superseded",
                ticket.generation(),
                ticket.client()
            );
            return Err(CalcError::Superseded);
        }
        let (catalog, table) = loaded?;

        let owned = OwnedSet::from_raw(&input_ids, &catalog);
        let outcome =
            MatchingEngine::with_config(&table, self.matching.clone()).find_matches(&owned);
        info!(
            "{} of {} input IDs usable, {} matches ({:?} pass)",
            owned.len(),
            input_ids.len(),
            outcome.len(),
            outcome.pass
        );

        Ok(Calculation {
            input_ids,
            owned,
            outcome,
            catalog,
            skipped_solutions: table.skipped(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::source::{DataSource, SolutionSource, SourceConfig};
    use crate::core::types::{MatchPass, MatchTier};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn calculator(catalog: &NamedTempFile, solutions: &NamedTempFile) -> Calculator {
        let config = SourceConfig {
            catalog: DataSource::path(catalog.path()),
            solutions: SolutionSource::Flat(DataSource::path(solutions.path())),
            timeout: Duration::from_secs(5),
        };
        Calculator::new(DataLoader::new(config).unwrap(), MatchingConfig::default())
    }

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let tracker = CalculationTracker::new();
        let first = tracker.begin("a");
        let other = tracker.begin("b");
        let second = tracker.begin("a");

        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
        assert!(tracker.is_current(&other));
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn test_dropping_stale_ticket_keeps_current() {
        let tracker = CalculationTracker::new();
        let first = tracker.begin("a");
        let second = tracker.begin("a");

        drop(first);
        assert_eq!(tracker.active(), 1);
        assert!(tracker.is_current(&second));
        drop(second);
        assert_eq!(tracker.active(), 0);
    }

    #[tokio::test]
    async fn test_calculate_strict_match() {
        let catalog = write_temp("id,rarity,title\n1,4,A\n2,3,B\n3,4,C\n4,3,D\n5,3,E\n");
        let solutions = write_temp(r#"[{"quad":[1,2,3,4],"support_set":[5]}]"#);
        let calc = calculator(&catalog, &solutions);

        let result = calc.calculate("cli", "1, 2, 3, 5").await.unwrap();
        assert_eq!(result.input_ids.len(), 4);
        assert_eq!(result.outcome.pass, MatchPass::Strict);
        assert_eq!(result.outcome.results[0].tier, MatchTier::Strong);
        assert_eq!(calc.tracker().active(), 0);
    }

    #[tokio::test]
    async fn test_invalid_input_fails_before_loading() {
        // Paths do not exist: a load attempt would produce a source error
        let config = SourceConfig {
            catalog: DataSource::path("/nonexistent/cards.csv"),
            solutions: SolutionSource::Flat(DataSource::path("/nonexistent/solutions.json")),
            timeout: Duration::from_secs(1),
        };
        let calc = Calculator::new(DataLoader::new(config).unwrap(), MatchingConfig::default());

        let err = calc.calculate("cli", "1,,2").await.unwrap_err();
        assert!(matches!(err, CalcError::Input(_)));
        assert_eq!(calc.tracker().active(), 0);
    }

    #[tokio::test]
    async fn test_missing_data_is_source_error() {
        let config = SourceConfig {
            catalog: DataSource::path("/nonexistent/cards.csv"),
            solutions: SolutionSource::Flat(DataSource::path("/nonexistent/solutions.json")),
            timeout: Duration::from_secs(1),
        };
        let calc = Calculator::new(DataLoader::new(config).unwrap(), MatchingConfig::default());

        let err = calc.calculate("cli", "1,2").await.unwrap_err();
        assert!(matches!(err, CalcError::Source(_)));
    }

    #[tokio::test]
    async fn test_superseded_calculation_discarded() {
        let catalog = write_temp("id,rarity,title\n1,4,A\n");
        let solutions = write_temp("[]");
        let calc = calculator(&catalog, &solutions);

        let stale = calc.tracker().begin("web");
        let fresh = calc.tracker().begin("web");

        let err = calc.run(&stale, vec![CardId(1)]).await.unwrap_err();
        assert!(matches!(err, CalcError::Superseded));

        let result = calc.run(&fresh, vec![CardId(1)]).await.unwrap();
        assert_eq!(result.outcome.pass, MatchPass::None);
        assert_eq!(result.owned.len(), 1);
    }

    /// Accept connections and never answer them
    async fn silent_listener() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_dropped_calculations_release_clients() {
        let base = silent_listener().await;
        let config = SourceConfig {
            catalog: DataSource::url(format!("{base}/cards.csv")),
            solutions: SolutionSource::Flat(DataSource::url(format!("{base}/solutions.json"))),
            timeout: Duration::from_secs(30),
        };
        let calc = Calculator::new(DataLoader::new(config).unwrap(), MatchingConfig::default());

        for i in 0..20 {
            let client = format!("client-{i}");
            let pending = tokio::time::timeout(
                Duration::from_millis(10),
                calc.calculate(&client, "1,2"),
            )
            .await;
            assert!(pending.is_err());
        }

        assert_eq!(calc.tracker().active(), 0);
    }
}
