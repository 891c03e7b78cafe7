//! Renders trace steps against the model they were produced from.

use crate::config::{OutputFormat, RenderConfig};
use crate::record::{
    EdgeRecord, StateRecord, TraceRecord, TransitionRecord, Valuation, ZoneConstraint,
};
use crate::sync::SyncKind;
use std::io::{self, Write};
use tracer_model::Model;
use tracer_trace::{EdgeSelection, SymbolicState, TraceStep, Transition};

/// Render-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
    /// A record could not be serialized
    #[error("serialization error: {0}")]
    Serialize(String),
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

/// Renderer for the steps of one trace
///
/// Indices are resolved through the model; unknown indices render as empty
/// names rather than failing. The trace reader rejects them beforehand.
pub struct Renderer<'m> {
    model: &'m Model,
    config: RenderConfig,
}

impl<'m> Renderer<'m> {
    /// Create a renderer
    #[must_use]
    pub fn new(model: &'m Model, config: RenderConfig) -> Self {
        Self { model, config }
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Resolve a state
    #[must_use]
    pub fn state_record(&self, state: &SymbolicState) -> StateRecord {
        let locations = state
            .locations
            .iter()
            .enumerate()
            .map(|(p, &local)| {
                let location = self
                    .model
                    .global_location(p, local)
                    .map_or("", |global| self.model.cell_name(global));
                format!("{}.{}", self.process_name(p), location)
            })
            .collect();

        let names = self.model.variable_names();
        let variables = state
            .integers
            .iter()
            .enumerate()
            .map(|(i, &value)| Valuation {
                name: names.get(i).cloned().unwrap_or_default(),
                value,
            })
            .collect();

        let zone = state
            .zone
            .constraints()
            .map(|(i, j, bound)| ZoneConstraint {
                left: self.clock_name(i).to_string(),
                right: self.clock_name(j).to_string(),
                bound,
            })
            .collect();

        StateRecord {
            locations,
            variables,
            zone,
        }
    }

    /// Resolve one edge of a transition
    #[must_use]
    pub fn edge_record(&self, selection: &EdgeSelection) -> EdgeRecord {
        let process = self.process_name(selection.process).to_string();
        let edge = self
            .model
            .global_edge(selection.process, selection.edge)
            .and_then(|global| self.model.edge(global));

        let (source, target, guard, sync, update) = match edge {
            Some(edge) => (
                self.model.cell_name(edge.source),
                self.model.cell_name(edge.target),
                self.model.expression(edge.guard),
                self.model.expression(edge.sync),
                self.model.expression(edge.update),
            ),
            None => {
                tracing::warn!(
                    process = selection.process,
                    edge = selection.edge,
                    "edge not in model"
                );
                ("", "", "", "", "")
            }
        };
        let (sync_kind, channel) = SyncKind::classify(sync);

        EdgeRecord {
            process,
            source: source.to_string(),
            target: target.to_string(),
            selects: selection.selects.clone(),
            guard: guard.to_string(),
            sync: sync.to_string(),
            update: update.to_string(),
            sync_kind,
            channel: channel.map(str::to_string),
        }
    }

    /// Resolve a transition
    #[must_use]
    pub fn transition_record(&self, transition: &Transition) -> TransitionRecord {
        TransitionRecord::new(transition.edges.iter().map(|e| self.edge_record(e)).collect())
    }

    /// Text form of a state: locations, then variables, then the zone
    #[must_use]
    pub fn render_state(&self, state: &SymbolicState) -> String {
        self.state_record(state).render(self.config.is_ascii())
    }

    /// Text form of a transition: its edges, space separated
    #[must_use]
    pub fn render_transition(&self, transition: &Transition) -> String {
        self.transition_record(transition).to_string()
    }

    /// Write one step in the configured format.
    ///
    /// Text output frames each step as a `State:` or `Transition:` block
    /// preceded by an empty line; JSON output writes one object per line.
    ///
    /// # Errors
    ///
    /// Returns error if writing fails
    pub fn write_step<W: Write>(
        &self,
        out: &mut W,
        step: &TraceStep,
        annotation: Option<&str>,
    ) -> Result<(), RenderError> {
        match self.config.format {
            OutputFormat::Text => match step {
                TraceStep::State(state) => {
                    writeln!(out, "\nState: {}", self.render_state(state))?;
                }
                TraceStep::Transition(transition) => {
                    writeln!(out, "\nTransition: {}", self.render_transition(transition))?;
                    if let Some(annotation) = annotation {
                        writeln!(out, "{}", annotation)?;
                    }
                }
            },
            OutputFormat::Json => {
                let record = match step {
                    TraceStep::State(state) => TraceRecord::State(self.state_record(state)),
                    TraceStep::Transition(transition) => TraceRecord::Transition {
                        transition: self.transition_record(transition),
                        annotation: annotation.map(str::to_string),
                    },
                };
                serde_json::to_writer(&mut *out, &record)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }

    fn process_name(&self, process: usize) -> &str {
        self.model.process(process).map_or("", |p| p.name.as_str())
    }

    fn clock_name(&self, clock: usize) -> &str {
        self.model
            .clock_names()
            .get(clock)
            .map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelationStyle;
    use proptest::prelude::*;
    use tracer_core::Bound;

    const MODEL: &str = "\
layout
0:clock:1:t(0)
1:clock:1:x
2:var:0:10:0:0:n
3:location::idle
4:location::busy
5:location::off

processes
0:0:P
1:0:Q

locations
3:0:1
4:0:1
5:1:1

edges
0:3:4:1:2:3
1:5:5:1:4:1

expressions
1:0:0:1
2:0:0:tau
3:0:0:x:=0
4:0:0:go!
";

    fn model() -> Model {
        tracer_model::parse(MODEL).unwrap()
    }

    #[test]
    fn test_render_transition() {
        let model = model();
        let renderer = Renderer::new(&model, RenderConfig::default());
        let t = Transition::new().with_edge(0, 0, vec![]);
        assert_eq!(renderer.render_transition(&t), "P.idle -> P.busy {1; tau; x:=0;}");
    }

    #[test]
    fn test_render_synchronisation() {
        let model = model();
        let renderer = Renderer::new(&model, RenderConfig::default());
        let t = Transition::new().with_edge(1, 0, vec![3]).with_edge(0, 0, vec![]);
        assert_eq!(
            renderer.render_transition(&t),
            "Q.off -> Q.off [3] {1; go!; 1;} P.idle -> P.busy {1; tau; x:=0;}"
        );
        let record = renderer.transition_record(&t);
        assert_eq!(record.action.as_deref(), Some("go"));
        assert_eq!(record.edges[1].sync_kind, SyncKind::Internal);
    }

    #[test]
    fn test_render_state() {
        let model = model();
        let mut state = SymbolicState::new(2, 2, 1);
        state.locations = vec![1, 0];
        state.integers = vec![7];
        state.zone.set(1, 0, Bound::new(5, true));

        let unicode = Renderer::new(&model, RenderConfig::default());
        assert_eq!(
            unicode.render_state(&state),
            "P.busy Q.off n=7 t(0)-x≤0 x-t(0)<5"
        );

        let ascii = Renderer::new(&model, RenderConfig::ascii());
        assert_eq!(ascii.config().relation, RelationStyle::Ascii);
        assert_eq!(
            ascii.render_state(&state),
            "P.busy Q.off n=7 t(0)-x<=0 x-t(0)<5"
        );
    }

    #[test]
    fn test_unknown_indices_render_empty() {
        let model = model();
        let renderer = Renderer::new(&model, RenderConfig::default());
        let t = Transition::new().with_edge(0, 9, vec![]);
        assert_eq!(renderer.render_transition(&t), "P. -> P. {; ; ;}");
    }

    #[test]
    fn test_write_text_steps() {
        let model = model();
        let renderer = Renderer::new(&model, RenderConfig::ascii());
        let mut out = Vec::new();
        let state = SymbolicState::new(2, 2, 1);
        renderer
            .write_step(&mut out, &TraceStep::State(state), None)
            .unwrap();
        let t = Transition::new().with_edge(0, 0, vec![]);
        renderer
            .write_step(&mut out, &TraceStep::Transition(t), Some("note"))
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\nState: P.idle Q.off n=0 t(0)-x<=0\n\
             \nTransition: P.idle -> P.busy {1; tau; x:=0;}\nnote\n"
        );
    }

    #[test]
    fn test_write_json_steps() {
        let model = model();
        let config = RenderConfig::default().with_format(OutputFormat::Json);
        let renderer = Renderer::new(&model, config);
        let mut out = Vec::new();
        renderer
            .write_step(&mut out, &TraceStep::State(SymbolicState::new(2, 2, 1)), None)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["kind"], "state");
        assert_eq!(value["locations"][1], "Q.off");
        assert_eq!(value["variables"][0]["name"], "n");
    }

    proptest! {
        #[test]
        fn prop_rendering_never_prints_infinity(
            packed in -1_000_000i32..1_000_000,
            strict in any::<bool>(),
        ) {
            let model = model();
            let renderer = Renderer::new(&model, RenderConfig::ascii());
            let mut state = SymbolicState::new(2, 2, 1);
            state.zone.set(0, 1, Bound::from_packed(packed));
            state.zone.set(1, 0, Bound::new(Bound::INFINITY.magnitude, strict));
            let text = renderer.render_state(&state);
            let infinity = Bound::INFINITY.magnitude.to_string();
            prop_assert!(!text.contains(&infinity));
            prop_assert!(text.contains("t(0)-x"));
            prop_assert!(!text.contains("x-t(0)"));
        }
    }
}
