//! Extension point for per-transition guard annotations.
//!
//! Rendering never depends on an annotator. The CLI asks the configured
//! annotator for every transition and appends whatever it returns.

use crate::transition::Transition;
use serde::{Deserialize, Serialize};
use tracer_model::Model;

/// Produces an optional annotation for a transition
pub trait GuardAnnotator {
    /// Annotate a transition of `model`; `None` adds nothing to the output
    fn annotate(&self, model: &Model, transition: &Transition) -> Option<String>;
}

/// Annotator that never annotates
#[derive(Debug, Clone, Copy, Default)]
pub struct Unannotated;

impl GuardAnnotator for Unannotated {
    fn annotate(&self, _model: &Model, _transition: &Transition) -> Option<String> {
        None
    }
}

impl<F> GuardAnnotator for F
where
    F: Fn(&Model, &Transition) -> Option<String>,
{
    fn annotate(&self, model: &Model, transition: &Transition) -> Option<String> {
        self(model, transition)
    }
}

/// A guarded edge and the clocks local to its process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardScope {
    /// Process name
    pub process: String,
    /// Guard text as it appears in the model
    pub guard: String,
    /// Clocks declared in the process, without the process prefix
    pub clocks: Vec<String>,
}

/// Guards of the edges of a transition, skipping the trivial guard `1`.
///
/// Edges the model does not know are skipped.
#[must_use]
pub fn guard_scopes(model: &Model, transition: &Transition) -> Vec<GuardScope> {
    transition
        .edges
        .iter()
        .filter_map(|selection| {
            let process = model.process(selection.process)?;
            let edge = model.edge(model.global_edge(selection.process, selection.edge)?)?;
            let guard = model.expression(edge.guard).trim();
            if guard.is_empty() || guard == "1" {
                return None;
            }
            let prefix = format!("{}.", process.name);
            let clocks = model
                .clock_names()
                .iter()
                .filter_map(|name| name.strip_prefix(&prefix))
                .map(str::to_string)
                .collect();
            Some(GuardScope {
                process: process.name.clone(),
                guard: guard.to_string(),
                clocks,
            })
        })
        .collect()
}
