//! Graph data structures for cluster topology
//!
//! This module provides the structures that hold resources and their
//! relationships while a context graph is being assembled. Resources are
//! deduplicated by id (first writer wins); relations are kept in the order
//! they were added, duplicates included.

use super::label::{LABEL_KEY, Labeled};
use crate::error::{GraphError, GraphResult};
use crate::models::{RelationKind, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Annotation key holding the version of the collector that created the entry
pub const CREATED_BY_KEY: &str = "createdBy";

/// A resource in the context graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique identifier, `"<Type>:<native-id>"`
    pub id: String,
    /// Resource kind
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    /// When the metadata was observed (ISO-8601)
    pub timestamp: String,
    /// Always contains `label`; may contain `alternateLabel` and `createdBy`
    pub annotations: Map<String, Value>,
    /// Raw metadata payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

/// An edge representing a relationship between resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Source resource ID
    pub source: String,
    /// Target resource ID
    pub target: String,
    /// Relationship type
    #[serde(rename = "type")]
    pub kind: RelationKind,
    pub annotations: RelationAnnotations,
}

/// Annotations attached to a relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationAnnotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Labeled for Resource {
    fn label(&self) -> Option<&str> {
        self.annotations.label()
    }

    fn alternate_label(&self) -> Option<&str> {
        self.annotations.alternate_label()
    }
}

impl Labeled for Relation {
    fn label(&self) -> Option<&str> {
        Some(self.annotations.label.as_str())
    }
}

/// A graph representing a point-in-time view of the cluster
#[derive(Debug, Clone, Default)]
pub struct ContextGraph {
    /// All resources in insertion order
    resources: Vec<Resource>,
    /// All relations in insertion order
    relations: Vec<Relation>,
    /// Map from resource ID to index in resources vector
    resource_index: HashMap<String, usize>,
    version: Option<String>,
    title: Option<String>,
    metadata: Option<Value>,
}

impl ContextGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource to the graph
    ///
    /// A resource may be reachable from more than one parent (for example an
    /// image shared by several containers). Only the first add of an id is
    /// stored; later adds are ignored.
    ///
    /// The annotations are copied, so later changes to the caller's map do
    /// not reach the graph.
    pub fn add_resource(
        &mut self,
        id: &str,
        annotations: &Map<String, Value>,
        kind: ResourceKind,
        timestamp: &str,
        properties: Option<Value>,
    ) -> GraphResult<()> {
        require_non_empty("resource id", id)?;
        require_non_empty("resource timestamp", timestamp)?;
        match annotations.label() {
            Some(label) if !label.is_empty() => {}
            _ => {
                return Err(GraphError::Validation(format!(
                    "resource {} has no non-empty \"{}\" annotation",
                    id, LABEL_KEY
                )));
            }
        }

        if self.resource_index.contains_key(id) {
            tracing::debug!("Resource {} already in graph, keeping first copy", id);
            return Ok(());
        }

        let mut annotations = annotations.clone();
        if let Some(version) = &self.version {
            annotations.insert(CREATED_BY_KEY.to_string(), Value::String(version.clone()));
        }

        self.resource_index
            .insert(id.to_string(), self.resources.len());
        self.resources.push(Resource {
            id: id.to_string(),
            kind,
            timestamp: timestamp.to_string(),
            annotations,
            properties,
        });

        Ok(())
    }

    /// Add a relation to the graph
    ///
    /// Relations are never deduplicated. The label defaults to the relation
    /// type when none is given.
    pub fn add_relation(
        &mut self,
        source: &str,
        target: &str,
        kind: RelationKind,
        label: Option<&str>,
        metadata: Option<Map<String, Value>>,
    ) -> GraphResult<()> {
        require_non_empty("relation source", source)?;
        require_non_empty("relation target", target)?;
        if let Some(label) = label {
            require_non_empty("relation label", label)?;
        }

        self.relations.push(Relation {
            source: source.to_string(),
            target: target.to_string(),
            kind,
            annotations: RelationAnnotations {
                metadata,
                label: label.unwrap_or(kind.as_str()).to_string(),
                created_by: self.version.clone(),
            },
        });

        Ok(())
    }

    /// Set the version stamped on every resource and relation added afterwards
    pub fn set_version(&mut self, version: &str) -> GraphResult<()> {
        require_non_empty("graph version", version)?;
        self.version = Some(version.to_string());
        Ok(())
    }

    /// Set the title of the graph
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Set free-form metadata describing the graph
    pub fn set_metadata(&mut self, metadata: Value) {
        self.metadata = Some(metadata);
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Look up a resource by id
    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resource_index
            .get(id)
            .and_then(|&index| self.resources.get(index))
    }

    pub fn contains_resource(&self, id: &str) -> bool {
        self.resource_index.contains_key(id)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    /// True when the graph has neither resources nor relations
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.relations.is_empty()
    }
}

fn require_non_empty(field: &str, value: &str) -> GraphResult<()> {
    if value.is_empty() {
        return Err(GraphError::Validation(format!("{} must be non-empty", field)));
    }
    Ok(())
}
