//! XTR Tracer Render
//!
//! Turns trace steps into text or JSON, naming processes, locations,
//! variables and clocks after the model.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod record;
pub mod renderer;
pub mod sync;

pub use config::{OutputFormat, RelationStyle, RenderConfig};
pub use record::{EdgeRecord, StateRecord, TraceRecord, TransitionRecord, Valuation, ZoneConstraint};
pub use renderer::{RenderError, Renderer};
pub use sync::SyncKind;
