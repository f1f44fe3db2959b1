use serde::{Deserialize, Serialize};

use crate::catalog::table::SolutionTable;
use crate::core::solution::Solution;
use crate::core::types::{CardId, MatchPass, MatchTier};
use crate::matching::ownership::OwnedSet;

/// Owned-quad thresholds for one pass over the solution table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchThresholds {
    /// Minimum owned quad cards when at least one support card is owned
    pub strong_min_quad: usize,
    /// Minimum owned quad cards when no support card is owned
    pub borrow_min_quad: usize,
}

/// Strict pass: near-complete decks only
pub const STRICT_THRESHOLDS: MatchThresholds = MatchThresholds {
    strong_min_quad: 3,
    borrow_min_quad: 4,
};

/// Relaxed pass, used only when the strict pass finds nothing
pub const RELAXED_THRESHOLDS: MatchThresholds = MatchThresholds {
    strong_min_quad: 1,
    borrow_min_quad: 3,
};

/// Configuration for the matching engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub strict: MatchThresholds,
    /// `None` disables the relaxed fallback
    pub relaxed: Option<MatchThresholds>,
    /// List decks one card short of the strict thresholds instead of
    /// buildable ones
    #[serde(default)]
    pub near_miss: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            strict: STRICT_THRESHOLDS,
            relaxed: Some(RELAXED_THRESHOLDS),
            near_miss: false,
        }
    }
}

/// A solution that the owned set satisfies at some tier
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub solution: Solution,

    pub tier: MatchTier,

    /// Number of quad cards the player owns (0-4)
    pub quad_owned_count: usize,

    /// Owned support cards, or the whole support set when none is owned
    pub used_support_ids: Vec<CardId>,

    /// True if at least one support card is owned
    pub support_owned: bool,
}

/// Owned-card counts of one solution
struct Coverage {
    quad_owned_count: usize,
    owned_support: Vec<CardId>,
}

impl Coverage {
    fn of(solution: &Solution, owned: &OwnedSet) -> Self {
        Self {
            quad_owned_count: solution.quad.iter().filter(|&&id| owned.contains(id)).count(),
            owned_support: solution
                .support_set()
                .iter()
                .copied()
                .filter(|&id| owned.contains(id))
                .collect(),
        }
    }

    fn support_owned(&self) -> bool {
        !self.owned_support.is_empty()
    }

    fn into_result(self, solution: &Solution, tier: MatchTier) -> MatchResult {
        let support_owned = self.support_owned();
        let used_support_ids = if support_owned {
            self.owned_support
        } else {
            solution.support_set().to_vec()
        };

        MatchResult {
            solution: solution.clone(),
            tier,
            quad_owned_count: self.quad_owned_count,
            used_support_ids,
            support_owned,
        }
    }
}

impl MatchResult {
    /// Classify one solution against the owned set for a single pass.
    ///
    /// Returns `None` when the solution does not meet the pass thresholds.
    pub fn classify(
        solution: &Solution,
        owned: &OwnedSet,
        thresholds: MatchThresholds,
        relaxed: bool,
    ) -> Option<Self> {
        let coverage = Coverage::of(solution, owned);
        let quad_owned_count = coverage.quad_owned_count;

        let tier = match (coverage.support_owned(), relaxed) {
            (true, false) if quad_owned_count >= thresholds.strong_min_quad => MatchTier::Strong,
            (true, true) if quad_owned_count >= thresholds.strong_min_quad => {
                MatchTier::RelaxedStrong
            }
            (false, false) if quad_owned_count >= thresholds.borrow_min_quad => MatchTier::Borrow,
            (false, true) if quad_owned_count >= thresholds.borrow_min_quad => {
                MatchTier::RelaxedBorrow
            }
            _ => return None,
        };

        Some(coverage.into_result(solution, tier))
    }

    /// Classify a solution that misses `thresholds` by exactly one quad card.
    ///
    /// Buildable solutions and those further away return `None`.
    pub fn near_miss(
        solution: &Solution,
        owned: &OwnedSet,
        thresholds: MatchThresholds,
    ) -> Option<Self> {
        let coverage = Coverage::of(solution, owned);
        let (tier, needed) = if coverage.support_owned() {
            (MatchTier::NearStrong, thresholds.strong_min_quad)
        } else {
            (MatchTier::NearBorrow, thresholds.borrow_min_quad)
        };

        (needed > 0 && coverage.quad_owned_count + 1 == needed)
            .then(|| coverage.into_result(solution, tier))
    }
}

/// Matches surfaced for one calculation, in solution-table order
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub pass: MatchPass,
    pub results: Vec<MatchResult>,
}

impl MatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }
}

/// Run every pass the configuration allows, strictest first, and keep the
/// results of the first pass that produces anything.
pub fn match_solutions(
    solutions: &[Solution],
    owned: &OwnedSet,
    config: &MatchingConfig,
) -> MatchOutcome {
    if config.near_miss {
        let results: Vec<MatchResult> = solutions
            .iter()
            .filter_map(|s| MatchResult::near_miss(s, owned, config.strict))
            .collect();
        let pass = if results.is_empty() {
            MatchPass::None
        } else {
            MatchPass::NearMiss
        };
        return MatchOutcome { pass, results };
    }

    let strict = sweep(solutions, owned, config.strict, false);
    if !strict.is_empty() {
        return MatchOutcome {
            pass: MatchPass::Strict,
            results: strict,
        };
    }

    if let Some(thresholds) = config.relaxed {
        let relaxed = sweep(solutions, owned, thresholds, true);
        if !relaxed.is_empty() {
            return MatchOutcome {
                pass: MatchPass::Relaxed,
                results: relaxed,
            };
        }
    }

    MatchOutcome {
        pass: MatchPass::None,
        results: Vec::new(),
    }
}

fn sweep(
    solutions: &[Solution],
    owned: &OwnedSet,
    thresholds: MatchThresholds,
    relaxed: bool,
) -> Vec<MatchResult> {
    solutions
        .iter()
        .filter_map(|s| MatchResult::classify(s, owned, thresholds, relaxed))
        .collect()
}

/// The main matching engine
pub struct MatchingEngine<'a> {
    solutions: &'a SolutionTable,
    /// Pass thresholds
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with default configuration
    pub fn new(solutions: &'a SolutionTable) -> Self {
        Self {
            solutions,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(solutions: &'a SolutionTable, config: MatchingConfig) -> Self {
        Self { solutions, config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Find every solution the owned set satisfies
    pub fn find_matches(&self, owned: &OwnedSet) -> MatchOutcome {
        let outcome = match_solutions(self.solutions.solutions(), owned, &self.config);
        tracing::debug!(
            "{:?} pass matched {} of {} solutions",
            outcome.pass,
            outcome.len(),
            self.solutions.len()
        );
        outcome
    }
}
