//! Symbolic states: location vector, integer valuation and zone.

use serde::{Deserialize, Serialize};
use tracer_core::Bound;

/// Difference bound matrix over the clocks.
///
/// Entry `(i, j)` bounds `clock_i - clock_j`; clock 0 is the reference
/// clock. The matrix is kept exactly as read, without closure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    dim: usize,
    bounds: Vec<Bound>,
}

impl Zone {
    /// Unconstrained zone: row 0 and the diagonal are `(0, <=)`, every
    /// other entry is infinity
    #[must_use]
    pub fn new(dim: usize) -> Self {
        let mut zone = Self {
            dim,
            bounds: vec![Bound::INFINITY; dim * dim],
        };
        for i in 0..dim {
            zone.set(0, i, Bound::ZERO);
            zone.set(i, i, Bound::ZERO);
        }
        zone
    }

    /// Number of clocks
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Bound on `clock_i - clock_j`
    ///
    /// # Panics
    ///
    /// Panics if either index is not below [`Zone::dim`]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Bound {
        assert!(i < self.dim && j < self.dim, "clock index out of range");
        self.bounds[i * self.dim + j]
    }

    /// Overwrite the bound on `clock_i - clock_j`
    ///
    /// # Panics
    ///
    /// Panics if either index is not below [`Zone::dim`]
    pub fn set(&mut self, i: usize, j: usize, bound: Bound) {
        assert!(i < self.dim && j < self.dim, "clock index out of range");
        self.bounds[i * self.dim + j] = bound;
    }

    /// Finite bounds between distinct clocks, row by row
    pub fn constraints(&self) -> impl Iterator<Item = (usize, usize, Bound)> + '_ {
        let dim = self.dim;
        self.bounds
            .iter()
            .enumerate()
            .map(move |(k, bound)| (k / dim, k % dim, *bound))
            .filter(|(i, j, bound)| i != j && !bound.is_infinity())
    }
}

/// A symbolic state of the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolicState {
    /// Process-local location index, one per process
    pub locations: Vec<usize>,
    /// Value of each variable, in declaration order
    pub integers: Vec<i32>,
    /// Clock zone
    pub zone: Zone,
}

impl SymbolicState {
    /// State with every location and variable at zero and an unconstrained zone
    #[must_use]
    pub fn new(processes: usize, clocks: usize, variables: usize) -> Self {
        Self {
            locations: vec![0; processes],
            integers: vec![0; variables],
            zone: Zone::new(clocks),
        }
    }

    /// Location of a process
    #[must_use]
    pub fn location(&self, process: usize) -> Option<usize> {
        self.locations.get(process).copied()
    }

    /// Value of a variable
    #[must_use]
    pub fn variable(&self, index: usize) -> Option<i32> {
        self.integers.get(index).copied()
    }
}
