//! Cluster context graph library
//!
//! This library builds a point-in-time topology graph of a container cluster
//! (nodes, pods, containers, processes, images, services and replication
//! controllers) and renders it as DOT or as JSON documents. It is used by the
//! `clustergraph` binary and can be embedded by anything that can provide the
//! orchestrator and runtime metadata.

pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod metadata;
pub mod models;
pub mod topology;

// Re-export commonly used types for convenience
pub use context::{ComputeOptions, compute_graph, try_compute_graph};
pub use error::{ErrorEnvelope, GraphError, GraphResult};
pub use graph::{ContextGraph, OutputFormat, RenderOptions, Rendered, best_label};
pub use metadata::{ContainerRuntime, Orchestrator, RawResource, Snapshot, SnapshotSource};
pub use models::{RelationKind, ResourceKind};
pub use topology::{BuildOptions, ClusterNaming, build_context_graph};
