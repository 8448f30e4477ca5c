//! Metadata sources for graph building
//!
//! The topology builder never talks to a cluster directly. It pulls already
//! materialized metadata through two collaborators:
//! - [`Orchestrator`]: nodes, pods, services and replication controllers
//! - [`ContainerRuntime`]: per-host containers, processes and images
//!
//! [`SnapshotSource`] implements both from a recorded JSON or YAML document.

mod snapshot;

pub use snapshot::{Snapshot, SnapshotSource};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A resource record as reported by a metadata source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResource {
    /// Native id (without the `"<Type>:"` prefix)
    pub id: String,
    /// When the metadata was observed (ISO-8601)
    pub timestamp: String,
    /// Display annotations; `label` is expected
    #[serde(default)]
    pub annotations: Map<String, Value>,
    /// Raw metadata payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

impl RawResource {
    /// Follow `path` through nested objects under `properties`
    pub fn property(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(self.properties.as_ref()?, |value, key| value.get(key))
    }

    /// Like [`property`](Self::property), but only returns non-empty strings
    pub fn property_str(&self, path: &[&str]) -> Option<&str> {
        self.property(path)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Cluster orchestrator metadata (Kubernetes master)
#[cfg_attr(test, mockall::automock)]
pub trait Orchestrator {
    /// All nodes in the cluster, possibly none
    fn get_nodes(&self) -> Result<Vec<RawResource>>;

    /// Pods scheduled on the given node
    fn get_pods(&self, node_id: &str) -> Result<Vec<RawResource>>;

    fn get_services(&self) -> Result<Vec<RawResource>>;

    fn get_replication_controllers(&self) -> Result<Vec<RawResource>>;

    /// Pods whose labels match every key/value pair of `selector`
    fn get_selected_pods(&self, selector: &Map<String, Value>) -> Result<Vec<RawResource>>;
}

/// Container runtime metadata (Docker daemons on the nodes)
#[cfg_attr(test, mockall::automock)]
pub trait ContainerRuntime {
    /// Version string of the collector/runtime, stamped on every graph entry
    fn get_runtime_version(&self) -> Result<String>;

    fn get_containers(&self, host: &str, pod_id: &str) -> Result<Vec<RawResource>>;

    fn get_processes(&self, host: &str, container_id: &str) -> Result<Vec<RawResource>>;

    /// The image with the given id, or `None` if the host does not know it
    fn get_image(&self, host: &str, image_id: &str) -> Result<Option<RawResource>>;
}
