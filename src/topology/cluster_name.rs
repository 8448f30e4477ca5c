//! Cluster name derivation
//!
//! Kubernetes does not report a cluster name through the node listing, so the
//! name is derived from the id of the first node. How that id encodes the
//! cluster depends on the provider; the rule is configurable.

use serde::{Deserialize, Serialize};

/// Rule that turns the first node id into the cluster id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum ClusterNaming {
    /// Use the node id verbatim
    NodeId,
    /// Always use the given name
    Fixed { name: String },
    /// GCE internal host names: `<host>.c.<project>.internal` yields `<project>`
    #[default]
    GceProject,
    /// Split the node id on `delimiter` and take the segment at `index`
    Segment { delimiter: String, index: usize },
}

impl ClusterNaming {
    /// Apply the rule, returning `None` when the node id does not match it
    pub fn apply(&self, node_id: &str) -> Option<String> {
        let name = match self {
            ClusterNaming::NodeId => Some(node_id),
            ClusterNaming::Fixed { name } => Some(name.as_str()),
            ClusterNaming::GceProject => node_id
                .strip_suffix(".internal")
                .and_then(|rest| rest.split_once(".c."))
                .filter(|(host, _)| !host.is_empty())
                .map(|(_, project)| project),
            ClusterNaming::Segment { delimiter, index } => {
                if delimiter.is_empty() {
                    None
                } else {
                    node_id.split(delimiter.as_str()).nth(*index)
                }
            }
        };
        name.filter(|n| !n.is_empty()).map(str::to_string)
    }

    /// Apply the rule, falling back to the node id itself
    pub fn derive(&self, node_id: &str) -> String {
        self.apply(node_id).unwrap_or_else(|| {
            tracing::warn!(
                "Node id {} does not match cluster naming rule {:?}, using it verbatim",
                node_id,
                self
            );
            node_id.to_string()
        })
    }
}
