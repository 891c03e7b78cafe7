//! Rendering configuration.

use serde::{Deserialize, Serialize};

/// How non-strict bounds are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationStyle {
    /// `≤`
    #[default]
    Unicode,
    /// `<=`, as older tools print it
    Ascii,
}

/// Output format of a rendered trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `State:` and `Transition:` text blocks
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Render configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Relation symbol for non-strict bounds
    pub relation: RelationStyle,
    /// Output format
    pub format: OutputFormat,
}

impl RenderConfig {
    /// Create a new render config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text output with `<=` for non-strict bounds
    #[must_use]
    pub fn ascii() -> Self {
        Self {
            relation: RelationStyle::Ascii,
            format: OutputFormat::Text,
        }
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Whether bounds are written in plain ASCII
    #[must_use]
    pub fn is_ascii(&self) -> bool {
        self.relation == RelationStyle::Ascii
    }
}
