//! XTR Tracer Core Types
//!
//! This crate contains pure types and logic with no I/O.
//! It is shared by the model loader, the trace codec and the renderer.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bound;
pub mod error;

// Re-exports
pub use bound::Bound;
pub use error::{TracerError, TracerResult};
