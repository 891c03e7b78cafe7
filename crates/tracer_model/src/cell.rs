//! Cells of the model's global layout table.

use serde::{Deserialize, Serialize};

/// Location flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocationFlags {
    /// Ordinary location
    #[default]
    None,
    /// Committed location
    Committed,
    /// Urgent location
    Urgent,
}

/// One slot in the global layout table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// Constant
    Const {
        /// Value
        value: i32,
    },
    /// Clock
    Clock {
        /// Clock number, the index into a state's zone
        nr: i32,
        /// Clock name
        name: String,
    },
    /// Integer variable
    Var {
        /// Lower range
        min: i32,
        /// Upper range
        max: i32,
        /// Initial value
        init: i32,
        /// Variable number
        nr: i32,
        /// Variable name
        name: String,
    },
    /// Meta variable
    Meta {
        /// Lower range
        min: i32,
        /// Upper range
        max: i32,
        /// Initial value
        init: i32,
        /// Variable number
        nr: i32,
        /// Variable name
        name: String,
    },
    /// System meta variable
    SysMeta {
        /// Lower range
        min: i32,
        /// Upper range
        max: i32,
    },
    /// Location of a process
    Location {
        /// Location flags
        flags: LocationFlags,
        /// Owning process, set by the `locations` section
        process: Option<usize>,
        /// Invariant expression id, set by the `locations` section
        invariant: Option<i32>,
        /// Location name
        name: String,
    },
    /// Static (fixed) range
    Fixed {
        /// Lower range
        min: i32,
        /// Upper range
        max: i32,
    },
    /// Cost
    Cost,
}

impl Cell {
    /// Name of the cell, if its kind carries one
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Clock { name, .. }
            | Self::Var { name, .. }
            | Self::Meta { name, .. }
            | Self::Location { name, .. } => Some(name),
            Self::Const { .. } | Self::SysMeta { .. } | Self::Fixed { .. } | Self::Cost => None,
        }
    }

    /// Short tag of the cell kind, as written in the IF layout section
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Const { .. } => "const",
            Self::Clock { .. } => "clock",
            Self::Var { .. } => "var",
            Self::Meta { .. } => "meta",
            Self::SysMeta { .. } => "sys_meta",
            Self::Location { .. } => "location",
            Self::Fixed { .. } => "static",
            Self::Cost => "cost",
        }
    }

    /// Whether the cell is a location
    #[must_use]
    pub fn is_location(&self) -> bool {
        matches!(self, Self::Location { .. })
    }

    /// Whether the cell holds a value in a state's integer vector
    #[must_use]
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Var { .. } | Self::Meta { .. })
    }
}
