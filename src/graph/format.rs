//! Output format selection

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Encodings a context graph can be dumped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Graphviz DOT text
    Dot,
    /// Resources and relations wrapped in a success envelope
    #[default]
    ContextGraph,
    /// Resources only, wrapped in a success envelope
    Resources,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Dot => "dot",
            OutputFormat::ContextGraph => "context_graph",
            OutputFormat::Resources => "resources",
        }
    }

    /// Get all output formats
    pub fn all() -> &'static [Self] {
        &[
            OutputFormat::Dot,
            OutputFormat::ContextGraph,
            OutputFormat::Resources,
        ]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dot" => Ok(OutputFormat::Dot),
            "context_graph" => Ok(OutputFormat::ContextGraph),
            "resources" => Ok(OutputFormat::Resources),
            _ => Err(GraphError::InvalidFormat(s.to_string())),
        }
    }
}
