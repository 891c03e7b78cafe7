//! Streaming trace reader.
//!
//! A trace is an initial state followed by `(state, transition)` pairs and a
//! final `.` line. The reader hands out one step at a time and never holds
//! more than the state following the transition it just returned.

use crate::codec::{read_state, read_transition};
use crate::scanner::Scanner;
use crate::shape::TraceShape;
use crate::state::SymbolicState;
use crate::transition::Transition;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracer_core::{TracerError, TracerResult};
use tracer_model::Model;

/// One element of a trace, in output order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceStep {
    /// A symbolic state
    State(SymbolicState),
    /// The transition leading to the next state
    Transition(Transition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Initial,
    Steps,
    Done,
}

/// Iterator over the steps of an XTR trace
pub struct TraceReader<R> {
    scanner: Scanner<R>,
    shape: TraceShape,
    phase: Phase,
    pending: Option<SymbolicState>,
    steps: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Create a reader checking the trace against `shape`
    pub fn new(reader: R, shape: TraceShape) -> Self {
        Self {
            scanner: Scanner::new(reader),
            shape,
            phase: Phase::Initial,
            pending: None,
            steps: 0,
        }
    }

    /// Create a reader for traces of `model`
    pub fn for_model(reader: R, model: &Model) -> Self {
        Self::new(reader, TraceShape::from_model(model))
    }

    /// The shape the trace is read against
    #[must_use]
    pub fn shape(&self) -> &TraceShape {
        &self.shape
    }

    /// Current line in the trace stream
    #[must_use]
    pub fn line(&self) -> usize {
        self.scanner.line()
    }

    /// Read the remaining steps into a vector
    ///
    /// # Errors
    ///
    /// Returns the first error met
    pub fn read_all(self) -> TracerResult<Vec<TraceStep>> {
        self.collect()
    }

    fn advance(&mut self) -> TracerResult<Option<TraceStep>> {
        match self.phase {
            Phase::Done => Ok(None),
            Phase::Initial => {
                let state = read_state(&mut self.scanner, &self.shape)?;
                self.phase = Phase::Steps;
                Ok(Some(TraceStep::State(state)))
            }
            Phase::Steps => {
                if let Some(state) = self.pending.take() {
                    return Ok(Some(TraceStep::State(state)));
                }
                self.scanner.skip_whitespace()?;
                match self.scanner.peek()? {
                    None => Err(TracerError::end_of_input("state or trace terminator")),
                    Some(b'.') => {
                        self.scanner.expect_dot("trace")?;
                        self.phase = Phase::Done;
                        tracing::debug!(steps = self.steps, "trace complete");
                        Ok(None)
                    }
                    Some(_) => {
                        let state = read_state(&mut self.scanner, &self.shape)?;
                        let transition = read_transition(&mut self.scanner, &self.shape)?;
                        self.pending = Some(state);
                        self.steps += 1;
                        Ok(Some(TraceStep::Transition(transition)))
                    }
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = TracerResult<TraceStep>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(step) => step.map(Ok),
            Err(err) => {
                self.phase = Phase::Done;
                self.pending = None;
                Some(Err(err))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for TraceReader<R> {}
