use std::path::Path;

use crate::core::solution::Solution;
use crate::parsing::solutions::{parse_flat_solutions, parse_nested_solutions};
use crate::parsing::ParseError;

/// Ordered, read-only collection of precomputed deck solutions
#[derive(Debug, Clone, Default)]
pub struct SolutionTable {
    solutions: Vec<Solution>,

    /// Number of malformed entries dropped while loading
    skipped: usize,
}

impl SolutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_solutions(solutions: Vec<Solution>) -> Self {
        Self {
            solutions,
            skipped: 0,
        }
    }

    /// Load a flat solution table from a JSON file
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, ParseError> {
        let content = std::fs::read_to_string(path)?;
        parse_flat_solutions(&content)
    }

    /// Load the legacy nested pair of support-set and quad documents
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if either file cannot be read or parsed.
    pub fn load_nested_from_files(support: &Path, quads: &Path) -> Result<Self, ParseError> {
        let support = std::fs::read_to_string(support)?;
        let quads = std::fs::read_to_string(quads)?;
        parse_nested_solutions(&support, &quads)
    }

    pub fn push(&mut self, solution: Solution) {
        self.solutions.push(solution);
    }

    pub(crate) fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub(crate) fn record_skipped_n(&mut self, n: usize) {
        self.skipped += n;
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}
