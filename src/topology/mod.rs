//! Cluster topology discovery
//!
//! Turns orchestrator and container runtime metadata into a [`ContextGraph`](crate::graph::ContextGraph).

mod builder;
mod cluster_name;

pub use builder::{BuildOptions, build_context_graph};
pub use cluster_name::ClusterNaming;
