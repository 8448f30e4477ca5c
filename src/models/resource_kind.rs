//! Resource kind definitions
//!
//! This module provides a closed enum for every resource kind that can appear
//! in a context graph, together with the DOT color assigned to each kind.
//! Using the enum instead of free-form strings keeps resource ids, colors and
//! labels consistent across the builder and the renderers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enumeration of all resource kinds in a context graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Cluster,
    Node,
    Pod,
    Service,
    ReplicationController,
    Container,
    Process,
    Image,
}

impl ResourceKind {
    /// Get the display name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Cluster => "Cluster",
            ResourceKind::Node => "Node",
            ResourceKind::Pod => "Pod",
            ResourceKind::Service => "Service",
            ResourceKind::ReplicationController => "ReplicationController",
            ResourceKind::Container => "Container",
            ResourceKind::Process => "Process",
            ResourceKind::Image => "Image",
        }
    }

    /// DOT color used when rendering resources of this kind
    pub fn dot_color(&self) -> &'static str {
        match self {
            ResourceKind::Cluster => "black",
            ResourceKind::Node => "red",
            ResourceKind::Service => "darkgreen",
            ResourceKind::ReplicationController => "purple",
            ResourceKind::Pod => "blue",
            ResourceKind::Container => "green",
            ResourceKind::Process => "gold",
            ResourceKind::Image => "maroon",
        }
    }

    /// Build the graph-wide resource id for a native id: `"<Type>:<native-id>"`
    pub fn resource_id(&self, native_id: &str) -> String {
        format!("{}:{}", self.as_str(), native_id)
    }

    /// Get all resource kinds
    pub fn all() -> &'static [Self] {
        &[
            ResourceKind::Cluster,
            ResourceKind::Node,
            ResourceKind::Pod,
            ResourceKind::Service,
            ResourceKind::ReplicationController,
            ResourceKind::Container,
            ResourceKind::Process,
            ResourceKind::Image,
        ]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cluster" => Ok(ResourceKind::Cluster),
            "Node" => Ok(ResourceKind::Node),
            "Pod" => Ok(ResourceKind::Pod),
            "Service" => Ok(ResourceKind::Service),
            "ReplicationController" => Ok(ResourceKind::ReplicationController),
            "Container" => Ok(ResourceKind::Container),
            "Process" => Ok(ResourceKind::Process),
            "Image" => Ok(ResourceKind::Image),
            _ => Err(format!("Unknown resource kind: {}", s)),
        }
    }
}
