//! Graph encoders
//!
//! Rendering is a pure read of the [`ContextGraph`]; the same graph can be
//! dumped any number of times in any format.

use super::format::OutputFormat;
use super::label::best_label;
use super::store::{ContextGraph, Relation, Resource};
use crate::error::{ErrorEnvelope, GraphResult};
use serde::Serialize;
use serde_json::Value;

/// Options that affect how a graph is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Show `Type:label` on DOT nodes instead of filled, unlabeled nodes
    pub show_node_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_node_labels: true,
        }
    }
}

/// A rendered graph, or the error that prevented rendering it
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// DOT text
    Dot(String),
    /// A JSON document (`context_graph` or `resources`)
    Document(Value),
    /// The failure, in the context graph error format
    Error(ErrorEnvelope),
}

impl Rendered {
    /// False when this holds an [`ErrorEnvelope`]
    pub fn is_success(&self) -> bool {
        !matches!(self, Rendered::Error(_))
    }

    /// Text suitable for writing to a terminal or file
    ///
    /// DOT is returned verbatim, JSON is pretty printed.
    pub fn to_output_string(&self) -> String {
        match self {
            Rendered::Dot(text) => text.clone(),
            Rendered::Document(value) => format!("{:#}", value),
            Rendered::Error(envelope) => envelope.to_output_string(),
        }
    }

    pub fn as_document(&self) -> Option<&Value> {
        match self {
            Rendered::Document(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_dot(&self) -> Option<&str> {
        match self {
            Rendered::Dot(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorEnvelope> {
        match self {
            Rendered::Error(envelope) => Some(envelope),
            _ => None,
        }
    }
}

/// Success envelope for the `context_graph` and `resources` formats
#[derive(Debug, Serialize)]
pub struct ContextGraphDocument<'a> {
    pub success: bool,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a Value>,
    pub resources: &'a [Resource],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<&'a [Relation]>,
}

impl ContextGraph {
    /// Returns the graph in DOT format
    pub fn to_dot(&self, show_node_labels: bool) -> String {
        let resources = self.resources().iter().map(|res| {
            let color = res.kind.dot_color();
            if show_node_labels {
                format!(
                    "\"{}\"[label=\"{}\",color={}]",
                    escape_dot(&res.id),
                    escape_dot(&format!("{}:{}", res.kind, best_label(res))),
                    color
                )
            } else {
                format!(
                    "\"{}\"[label=\"\",fillcolor={},style=filled]",
                    escape_dot(&res.id),
                    color
                )
            }
        });
        let relations = self.relations().iter().map(|rel| {
            format!(
                "\"{}\"->\"{}\"[label=\"{}\"]",
                escape_dot(&rel.source),
                escape_dot(&rel.target),
                escape_dot(&best_label(rel))
            )
        });

        let items: Vec<String> = resources.chain(relations).collect();
        format!("digraph{{{}}}", items.join(";"))
    }

    /// Returns resources and relations wrapped in a success envelope
    pub fn to_context_graph(&self) -> ContextGraphDocument<'_> {
        ContextGraphDocument {
            success: true,
            timestamp: super::iso_timestamp_now(),
            title: self.title(),
            metadata: self.metadata(),
            resources: self.resources(),
            relations: Some(self.relations()),
        }
    }

    /// Returns just the resources wrapped in a success envelope
    pub fn to_context_resources(&self) -> ContextGraphDocument<'_> {
        ContextGraphDocument {
            success: true,
            timestamp: super::iso_timestamp_now(),
            title: None,
            metadata: None,
            resources: self.resources(),
            relations: None,
        }
    }

    /// Returns the graph in the format named by `output_format`
    ///
    /// Fails with [`GraphError::InvalidFormat`](crate::GraphError::InvalidFormat)
    /// for any tag other than `dot`, `context_graph` or `resources`.
    pub fn dump(&self, output_format: &str) -> GraphResult<Rendered> {
        let format = output_format.parse::<OutputFormat>().inspect_err(|e| {
            tracing::error!("{}", e);
        })?;
        self.dump_format(format, &RenderOptions::default())
    }

    /// Returns the graph in an already parsed format
    pub fn dump_format(
        &self,
        format: OutputFormat,
        options: &RenderOptions,
    ) -> GraphResult<Rendered> {
        match format {
            OutputFormat::Dot => Ok(Rendered::Dot(self.to_dot(options.show_node_labels))),
            OutputFormat::ContextGraph => Ok(Rendered::Document(serde_json::to_value(
                self.to_context_graph(),
            )?)),
            OutputFormat::Resources => Ok(Rendered::Document(serde_json::to_value(
                self.to_context_resources(),
            )?)),
        }
    }
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
