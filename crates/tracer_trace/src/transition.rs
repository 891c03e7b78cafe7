//! Transitions between symbolic states.

use serde::{Deserialize, Serialize};

/// One edge taking part in a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSelection {
    /// Owning process
    pub process: usize,
    /// Process-local edge index, 0-based
    pub edge: usize,
    /// Values bound to the edge's select parameters
    pub selects: Vec<i32>,
}

/// A transition: one edge, or several for synchronisations.
///
/// Edges appear in the order of the input; for a synchronisation the
/// sender usually comes first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The participating edges
    pub edges: Vec<EdgeSelection>,
}

impl Transition {
    /// Create an empty transition
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge
    #[must_use]
    pub fn with_edge(mut self, process: usize, edge: usize, selects: Vec<i32>) -> Self {
        self.edges.push(EdgeSelection {
            process,
            edge,
            selects,
        });
        self
    }

    /// Whether several processes move together
    #[must_use]
    pub fn is_synchronisation(&self) -> bool {
        self.edges.len() > 1
    }
}
