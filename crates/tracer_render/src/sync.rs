//! Classification of synchronisation labels.
//!
//! `c!` sends on channel `c`, `c?` receives on it. Anything else, including
//! the empty label and `0`, is an internal move.

use serde::{Deserialize, Serialize};

/// Role of an edge in a synchronisation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncKind {
    /// `channel!`
    Send,
    /// `channel?`
    Receive,
    /// No channel
    Internal,
}

impl SyncKind {
    /// Classify a synchronisation label, returning the channel it uses
    #[must_use]
    pub fn classify(sync: &str) -> (Self, Option<&str>) {
        let sync = sync.trim();
        if let Some(channel) = sync.strip_suffix('!') {
            (Self::Send, Some(channel.trim_end()))
        } else if let Some(channel) = sync.strip_suffix('?') {
            (Self::Receive, Some(channel.trim_end()))
        } else {
            (Self::Internal, None)
        }
    }
}
