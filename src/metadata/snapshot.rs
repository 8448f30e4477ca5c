//! Snapshot metadata source
//!
//! Reads cluster metadata from a local JSON or YAML document instead of a live
//! Kubernetes master and Docker daemons. Used by the CLI and for testing.

use super::{ContainerRuntime, Orchestrator, RawResource};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Recorded metadata for one cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Version string reported by the container runtime collector
    #[serde(default)]
    pub runtime_version: String,

    #[serde(default)]
    pub nodes: Vec<RawResource>,

    /// Pods keyed by node id
    #[serde(default)]
    pub pods: HashMap<String, Vec<RawResource>>,

    #[serde(default)]
    pub services: Vec<RawResource>,

    #[serde(default)]
    pub replication_controllers: Vec<RawResource>,

    /// Containers keyed by docker host, then pod id
    #[serde(default)]
    pub containers: HashMap<String, HashMap<String, Vec<RawResource>>>,

    /// Processes keyed by docker host, then container id
    #[serde(default)]
    pub processes: HashMap<String, HashMap<String, Vec<RawResource>>>,

    /// Images keyed by docker host, then image id
    #[serde(default)]
    pub images: HashMap<String, HashMap<String, RawResource>>,
}

/// Metadata source backed by a [`Snapshot`]
///
/// Implements both [`Orchestrator`] and [`ContainerRuntime`].
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    snapshot: Snapshot,
    origin: Option<PathBuf>,
}

impl SnapshotSource {
    /// Wrap an in-memory snapshot
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            origin: None,
        }
    }

    /// Load a snapshot file
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else
    /// as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Reading snapshot from file: {:?}", path);

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;

        let snapshot = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::parse_yaml(&content)
                .with_context(|| format!("Failed to parse YAML snapshot: {}", path.display()))?,
            _ => Self::parse_json(&content)
                .with_context(|| format!("Failed to parse JSON snapshot: {}", path.display()))?,
        };

        tracing::debug!(
            "Loaded snapshot with {} nodes, {} services, {} replication controllers",
            snapshot.nodes.len(),
            snapshot.services.len(),
            snapshot.replication_controllers.len()
        );

        Ok(Self {
            snapshot,
            origin: Some(path.to_path_buf()),
        })
    }

    pub fn parse_json(content: &str) -> Result<Snapshot> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn parse_yaml(content: &str) -> Result<Snapshot> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// File the snapshot was loaded from, if any
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// All pods in node order, then in the order they were recorded
    fn all_pods(&self) -> impl Iterator<Item = &RawResource> {
        self.snapshot
            .nodes
            .iter()
            .filter_map(|node| self.snapshot.pods.get(&node.id))
            .flatten()
    }
}

impl From<Snapshot> for SnapshotSource {
    fn from(snapshot: Snapshot) -> Self {
        Self::new(snapshot)
    }
}

impl Orchestrator for SnapshotSource {
    fn get_nodes(&self) -> Result<Vec<RawResource>> {
        Ok(self.snapshot.nodes.clone())
    }

    fn get_pods(&self, node_id: &str) -> Result<Vec<RawResource>> {
        Ok(self
            .snapshot
            .pods
            .get(node_id)
            .cloned()
            .unwrap_or_default())
    }

    fn get_services(&self) -> Result<Vec<RawResource>> {
        Ok(self.snapshot.services.clone())
    }

    fn get_replication_controllers(&self) -> Result<Vec<RawResource>> {
        Ok(self.snapshot.replication_controllers.clone())
    }

    fn get_selected_pods(&self, selector: &Map<String, Value>) -> Result<Vec<RawResource>> {
        Ok(self
            .all_pods()
            .filter(|pod| labels_match(pod, selector))
            .cloned()
            .collect())
    }
}

impl ContainerRuntime for SnapshotSource {
    fn get_runtime_version(&self) -> Result<String> {
        if self.snapshot.runtime_version.is_empty() {
            anyhow::bail!("Snapshot does not record a runtimeVersion");
        }
        Ok(self.snapshot.runtime_version.clone())
    }

    fn get_containers(&self, host: &str, pod_id: &str) -> Result<Vec<RawResource>> {
        Ok(self
            .snapshot
            .containers
            .get(host)
            .and_then(|by_pod| by_pod.get(pod_id))
            .cloned()
            .unwrap_or_default())
    }

    fn get_processes(&self, host: &str, container_id: &str) -> Result<Vec<RawResource>> {
        Ok(self
            .snapshot
            .processes
            .get(host)
            .and_then(|by_container| by_container.get(container_id))
            .cloned()
            .unwrap_or_default())
    }

    fn get_image(&self, host: &str, image_id: &str) -> Result<Option<RawResource>> {
        Ok(self
            .snapshot
            .images
            .get(host)
            .and_then(|by_image| by_image.get(image_id))
            .cloned())
    }
}

/// True when the pod's `properties.labels` contain every selector pair
///
/// An empty selector matches nothing.
fn labels_match(pod: &RawResource, selector: &Map<String, Value>) -> bool {
    if selector.is_empty() {
        return false;
    }
    let Some(labels) = pod.property(&["labels"]).and_then(Value::as_object) else {
        return false;
    };
    selector
        .iter()
        .all(|(key, value)| labels.get(key) == Some(value))
}
