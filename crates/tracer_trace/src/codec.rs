//! Readers for the two XTR records: states and transitions.
//!
//! ```text
//! state      = loc{N} "." { i j packed "." } "." int{M} "."
//! transition = { process edge select* (";" | newline) } "."
//! ```
//!
//! Locations and edges use process-local numbering. Transition records
//! ending in `;` carry 0-based edge indices; older traces end each edge with
//! a newline and count edges from 1.

use crate::scanner::Scanner;
use crate::shape::TraceShape;
use crate::state::SymbolicState;
use crate::transition::{EdgeSelection, Transition};
use std::io::BufRead;
use tracer_core::{Bound, TracerError, TracerResult};

/// Read one symbolic state
///
/// # Errors
///
/// Returns a fatal error if the record does not match the shape
pub fn read_state<R: BufRead>(
    scanner: &mut Scanner<R>,
    shape: &TraceShape,
) -> TracerResult<SymbolicState> {
    let mut state = SymbolicState::new(shape.process_count(), shape.clocks, shape.variables);

    if state.locations.is_empty() {
        tracing::warn!("reading a state of a model without processes");
    }
    for (process, limits) in shape.processes.iter().enumerate() {
        let line = scanner.line();
        let location = scanner.expect_int("location")?;
        state.locations[process] = checked_index(location, limits.locations).ok_or_else(|| {
            TracerError::invalid_trace(
                line,
                format!("location {} out of range for process {}", location, process),
            )
        })?;
    }
    scanner.expect_dot("locations")?;

    while let Some(i) = scanner.read_int()? {
        let line = scanner.line();
        let j = scanner.expect_int("clock index")?;
        let packed = scanner.expect_int("bound")?;
        let (Some(i), Some(j)) = (
            checked_index(i, shape.clocks),
            checked_index(j, shape.clocks),
        ) else {
            return Err(TracerError::invalid_trace(
                line,
                format!("clock pair ({}, {}) out of range for {} clocks", i, j, shape.clocks),
            ));
        };
        scanner.expect_dot("zone constraint")?;
        state.zone.set(i, j, Bound::from_packed(packed));
    }
    scanner.expect_dot("zone")?;

    for value in &mut state.integers {
        *value = scanner.expect_int("variable value")?;
    }
    scanner.expect_dot("variables")?;

    tracing::debug!(locations = ?state.locations, "read state");
    Ok(state)
}

/// Read one transition
///
/// # Errors
///
/// Returns a fatal error on tokens that are not integers, unknown processes
/// and edge indices out of range
pub fn read_transition<R: BufRead>(
    scanner: &mut Scanner<R>,
    shape: &TraceShape,
) -> TracerResult<Transition> {
    let mut transition = Transition::new();

    while let Some(process) = scanner.read_int()? {
        let line = scanner.line();
        let edge = scanner.expect_int("edge index")?;

        let mut selects = Vec::new();
        loop {
            scanner.skip_blanks()?;
            match scanner.peek()? {
                Some(b'\n' | b';') => break,
                None => return Err(TracerError::end_of_input("transition edge")),
                Some(other) => match scanner.read_int_here()? {
                    Some(value) => selects.push(value),
                    None => {
                        return Err(TracerError::invalid_trace(
                            line,
                            format!(
                                "transition format error: unexpected '{}'",
                                char::from(other).escape_default()
                            ),
                        ));
                    }
                },
            }
        }
        let legacy = scanner.bump()? == Some(b'\n');
        let local = if legacy { edge.saturating_sub(1) } else { edge };

        let Some(owner) = checked_index(process, shape.process_count()) else {
            return Err(TracerError::invalid_trace(
                line,
                format!("unknown process {}", process),
            ));
        };
        let Some(local) = checked_index(local, shape.processes[owner].edges) else {
            return Err(TracerError::invalid_trace(
                line,
                format!("edge {} out of range for process {}", edge, process),
            ));
        };

        transition.edges.push(EdgeSelection {
            process: owner,
            edge: local,
            selects,
        });
    }
    scanner.expect_dot("transition")?;

    tracing::debug!(
        edges = transition.edges.len(),
        synchronisation = transition.is_synchronisation(),
        "read transition"
    );
    Ok(transition)
}

fn checked_index(value: i32, len: usize) -> Option<usize> {
    usize::try_from(value).ok().filter(|&v| v < len)
}
