//! Element counts a trace must agree with.

use serde::{Deserialize, Serialize};
use tracer_model::Model;

/// Counts of one process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessShape {
    /// Number of locations
    pub locations: usize,
    /// Number of edges
    pub edges: usize,
}

impl ProcessShape {
    /// A process whose local indices are not checked
    pub const UNCHECKED: ProcessShape = ProcessShape {
        locations: usize::MAX,
        edges: usize::MAX,
    };
}

/// The counts the trace codec reads against; no names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceShape {
    /// Per-process counts, in process order
    pub processes: Vec<ProcessShape>,
    /// Number of clocks, including the reference clock
    pub clocks: usize,
    /// Number of integer variables
    pub variables: usize,
}

impl TraceShape {
    /// Shape with the given counts and no per-process limits
    #[must_use]
    pub fn counts(processes: usize, clocks: usize, variables: usize) -> Self {
        Self {
            processes: vec![ProcessShape::UNCHECKED; processes],
            clocks,
            variables,
        }
    }

    /// Shape of a loaded model
    #[must_use]
    pub fn from_model(model: &Model) -> Self {
        Self {
            processes: model
                .processes()
                .iter()
                .map(|p| ProcessShape {
                    locations: p.locations.len(),
                    edges: p.edges.len(),
                })
                .collect(),
            clocks: model.clock_count(),
            variables: model.variable_count(),
        }
    }

    /// Number of processes
    #[must_use]
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }
}

impl From<&Model> for TraceShape {
    fn from(model: &Model) -> Self {
        Self::from_model(model)
    }
}
