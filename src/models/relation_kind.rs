//! Relation kind definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of relationship between two resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// Containment (Cluster contains Node, Pod contains Container, ...)
    Contains,
    /// A Node runs a Pod
    Runs,
    /// A Container was created from an Image
    CreatedFrom,
    /// A Service load-balances across Pods
    LoadBalances,
    /// A ReplicationController monitors Pods
    Monitors,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Contains => "contains",
            RelationKind::Runs => "runs",
            RelationKind::CreatedFrom => "createdFrom",
            RelationKind::LoadBalances => "loadBalances",
            RelationKind::Monitors => "monitors",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contains" => Ok(RelationKind::Contains),
            "runs" => Ok(RelationKind::Runs),
            "createdFrom" => Ok(RelationKind::CreatedFrom),
            "loadBalances" => Ok(RelationKind::LoadBalances),
            "monitors" => Ok(RelationKind::Monitors),
            _ => Err(format!("Unknown relation kind: {}", s)),
        }
    }
}
