//! Resolved, named views of trace steps.
//!
//! Records carry names instead of indices. They are what the text output
//! is printed from and what the JSON output serializes.

use crate::sync::SyncKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracer_core::Bound;

/// `left - right` bounded by `bound`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConstraint {
    /// Minuend clock
    pub left: String,
    /// Subtrahend clock
    pub right: String,
    /// The bound, never infinity
    pub bound: Bound,
}

impl ZoneConstraint {
    /// Text form, e.g. `x-t(0)<5`
    #[must_use]
    pub fn render(&self, ascii: bool) -> String {
        format!(
            "{}-{}{}{}",
            self.left,
            self.right,
            self.bound.relation(ascii),
            self.bound.magnitude
        )
    }
}

/// A variable and its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuation {
    /// Variable name
    pub name: String,
    /// Value
    pub value: i32,
}

/// A state with names resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    /// `Process.location`, one per process
    pub locations: Vec<String>,
    /// Variable values in declaration order
    pub variables: Vec<Valuation>,
    /// Finite constraints between distinct clocks
    pub zone: Vec<ZoneConstraint>,
}

impl StateRecord {
    /// Space separated text form
    #[must_use]
    pub fn render(&self, ascii: bool) -> String {
        let locations = self.locations.iter().cloned();
        let variables = self
            .variables
            .iter()
            .map(|v| format!("{}={}", v.name, v.value));
        let zone = self.zone.iter().map(|c| c.render(ascii));
        locations
            .chain(variables)
            .chain(zone)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An edge of a transition with names and labels resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Process name
    pub process: String,
    /// Source location name
    pub source: String,
    /// Target location name
    pub target: String,
    /// Select values
    pub selects: Vec<i32>,
    /// Guard text
    pub guard: String,
    /// Synchronisation text
    pub sync: String,
    /// Update text
    pub update: String,
    /// Role in a synchronisation
    pub sync_kind: SyncKind,
    /// Channel, without the `!` or `?`
    pub channel: Option<String>,
}

impl fmt::Display for EdgeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{p}.{} -> {p}.{}",
            self.source,
            self.target,
            p = self.process
        )?;
        if !self.selects.is_empty() {
            let selects: Vec<String> = self.selects.iter().map(i32::to_string).collect();
            write!(f, " [{}]", selects.join(","))?;
        }
        write!(f, " {{{}; {}; {};}}", self.guard, self.sync, self.update)
    }
}

/// A transition with its edges resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Participating edges in input order
    pub edges: Vec<EdgeRecord>,
    /// Channel of the sending edge; `None` for internal moves
    pub action: Option<String>,
}

impl TransitionRecord {
    /// Build a record, deriving the action label from the edges
    #[must_use]
    pub fn new(edges: Vec<EdgeRecord>) -> Self {
        let action = edges
            .iter()
            .find(|e| e.sync_kind == SyncKind::Send)
            .and_then(|e| e.channel.clone());
        Self { edges, action }
    }
}

impl fmt::Display for TransitionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, edge) in self.edges.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", edge)?;
        }
        Ok(())
    }
}

/// One line of JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceRecord {
    /// A state
    State(StateRecord),
    /// A transition, with the annotation if one was produced
    Transition {
        /// The transition
        #[serde(flatten)]
        transition: TransitionRecord,
        /// Annotation from the configured annotator
        #[serde(skip_serializing_if = "Option::is_none", default)]
        annotation: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(sync: &str) -> EdgeRecord {
        let (sync_kind, channel) = SyncKind::classify(sync);
        EdgeRecord {
            process: "P".to_string(),
            source: "idle".to_string(),
            target: "busy".to_string(),
            selects: vec![],
            guard: "1".to_string(),
            sync: sync.to_string(),
            update: "x:=0".to_string(),
            sync_kind,
            channel: channel.map(str::to_string),
        }
    }

    #[test]
    fn test_edge_display() {
        assert_eq!(edge("tau").to_string(), "P.idle -> P.busy {1; tau; x:=0;}");

        let mut with_selects = edge("tau");
        with_selects.selects = vec![2, 0];
        assert_eq!(
            with_selects.to_string(),
            "P.idle -> P.busy [2,0] {1; tau; x:=0;}"
        );
    }

    #[test]
    fn test_action_label() {
        let t = TransitionRecord::new(vec![edge("go?"), edge("go!")]);
        assert_eq!(t.action.as_deref(), Some("go"));
        assert_eq!(TransitionRecord::new(vec![edge("tau")]).action, None);
    }

    #[test]
    fn test_transition_display_joins_edges() {
        let t = TransitionRecord::new(vec![edge("a!"), edge("a?")]);
        assert_eq!(
            t.to_string(),
            "P.idle -> P.busy {1; a!; x:=0;} P.idle -> P.busy {1; a?; x:=0;}"
        );
    }

    #[test]
    fn test_state_render() {
        let state = StateRecord {
            locations: vec!["P.idle".to_string()],
            variables: vec![Valuation {
                name: "n".to_string(),
                value: -3,
            }],
            zone: vec![ZoneConstraint {
                left: "x".to_string(),
                right: "t(0)".to_string(),
                bound: Bound::new(5, false),
            }],
        };
        assert_eq!(state.render(true), "P.idle n=-3 x-t(0)<=5");
        assert_eq!(state.render(false), "P.idle n=-3 x-t(0)≤5");
    }

    #[test]
    fn test_json_record_is_tagged() {
        let record = TraceRecord::Transition {
            transition: TransitionRecord::new(vec![edge("go!")]),
            annotation: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "transition");
        assert_eq!(json["action"], "go");
        assert_eq!(json["edges"][0]["sync_kind"], "send");
        assert!(json.get("annotation").is_none());
    }
}
