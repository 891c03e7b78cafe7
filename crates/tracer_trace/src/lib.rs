//! XTR Tracer Trace
//!
//! Reads symbolic traces in the XTR format. A trace is read against the
//! counts of its model so every index it yields can be resolved without
//! bounds failures.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod guard;
pub mod reader;
pub mod scanner;
pub mod shape;
pub mod state;
pub mod transition;

pub use codec::{read_state, read_transition};
pub use guard::{guard_scopes, GuardAnnotator, GuardScope, Unannotated};
pub use reader::{TraceReader, TraceStep};
pub use scanner::Scanner;
pub use shape::{ProcessShape, TraceShape};
pub use state::{SymbolicState, Zone};
pub use transition::{EdgeSelection, Transition};
