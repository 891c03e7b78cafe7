//! In-memory model in intermediate format.
//!
//! The IF numbers everything globally: layout cells, edges and
//! expressions. Processes map their own local numbering of locations and
//! edges onto these global indices.

use crate::cell::Cell;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A process of the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Local index of the initial location
    pub initial: i32,
    /// Process name
    pub name: String,
    /// Global layout indices of the locations, in local order
    pub locations: Vec<usize>,
    /// Global edge indices, in local order
    pub edges: Vec<usize>,
}

impl Process {
    /// Create a process with no locations or edges yet
    #[must_use]
    pub fn new(initial: i32, name: impl Into<String>) -> Self {
        Self {
            initial,
            name: name.into(),
            locations: Vec::new(),
            edges: Vec::new(),
        }
    }
}

/// An edge of a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Owning process
    pub process: usize,
    /// Global layout index of the source location
    pub source: usize,
    /// Global layout index of the target location
    pub target: usize,
    /// Guard expression id
    pub guard: i32,
    /// Synchronisation expression id
    pub sync: i32,
    /// Update expression id
    pub update: i32,
}

/// The model, immutable once loaded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub(crate) layout: Vec<Cell>,
    pub(crate) instructions: Vec<i32>,
    pub(crate) processes: Vec<Process>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) expressions: IndexMap<i32, String>,
    pub(crate) clocks: Vec<String>,
    pub(crate) variables: Vec<String>,
}

impl Model {
    /// Global layout table
    #[must_use]
    pub fn layout(&self) -> &[Cell] {
        &self.layout
    }

    /// Flat instruction stream
    #[must_use]
    pub fn instructions(&self) -> &[i32] {
        &self.instructions
    }

    /// Processes, in declaration order
    #[must_use]
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Edges, in declaration order
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Expression texts by id
    #[must_use]
    pub fn expressions(&self) -> &IndexMap<i32, String> {
        &self.expressions
    }

    /// Clock names by clock number, the reference clock first
    #[must_use]
    pub fn clock_names(&self) -> &[String] {
        &self.clocks
    }

    /// Variable names by position in a state's integer vector
    #[must_use]
    pub fn variable_names(&self) -> &[String] {
        &self.variables
    }

    /// Number of processes
    #[must_use]
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Number of clocks, including the reference clock
    #[must_use]
    pub fn clock_count(&self) -> usize {
        self.clocks.len()
    }

    /// Number of integer variables and meta variables
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Get a process
    #[must_use]
    pub fn process(&self, index: usize) -> Option<&Process> {
        self.processes.get(index)
    }

    /// Get an edge by global index
    #[must_use]
    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    /// Get a layout cell
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.layout.get(index)
    }

    /// Name of the cell at a global index, empty if it has none
    #[must_use]
    pub fn cell_name(&self, index: usize) -> &str {
        self.cell(index).and_then(Cell::name).unwrap_or_default()
    }

    /// Text of an expression; unknown ids yield the empty string
    #[must_use]
    pub fn expression(&self, id: i32) -> &str {
        self.expressions.get(&id).map(String::as_str).unwrap_or_default()
    }

    /// Global edge index of a process-local edge
    #[must_use]
    pub fn global_edge(&self, process: usize, local: usize) -> Option<usize> {
        self.processes.get(process)?.edges.get(local).copied()
    }

    /// Global layout index of a process-local location
    #[must_use]
    pub fn global_location(&self, process: usize, local: usize) -> Option<usize> {
        self.processes.get(process)?.locations.get(local).copied()
    }
}
