//! XTR Tracer Model
//!
//! Loads a model in the intermediate format (IF) produced by the model
//! checker. The IF uses a global numbering of clocks, variables, locations
//! and edges; the model keeps the tables needed to map the process-local
//! numbering of traces back onto it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod loader;
pub mod model;

pub use cell::{Cell, LocationFlags};
pub use loader::{load, parse, ModelLoader, Section};
pub use model::{Edge, Model, Process};
