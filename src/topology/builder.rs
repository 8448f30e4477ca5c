//! Graph builder for discovering cluster topology
//!
//! Walks the metadata reported by the orchestrator and the container runtime
//! and records every resource and relation in a [`ContextGraph`]:
//!
//! ```text
//! Cluster -contains-> Node -runs-> Pod -contains-> Container -contains-> Process
//!                                                  Container -createdFrom-> Image
//! Cluster -contains-> Service -loadBalances-> Pod
//! Cluster -contains-> ReplicationController -monitors-> Pod
//! ```
//!
//! Resources are always added before the relations that reference them.

use super::ClusterNaming;
use crate::error::{GraphError, GraphResult};
use crate::graph::{ContextGraph, LABEL_KEY, iso_timestamp_now};
use crate::metadata::{ContainerRuntime, Orchestrator, RawResource};
use crate::models::{RelationKind, ResourceKind};
use serde_json::{Map, Value, json};

/// Settings for a single graph build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// How the cluster id is derived from the first node id
    pub cluster_naming: ClusterNaming,
}

/// Build the context graph of the whole cluster
///
/// Fails on the first collaborator error, on invalid resource data and on
/// pods without a docker host. No partial graph is returned.
pub fn build_context_graph(
    orchestrator: &dyn Orchestrator,
    runtime: &dyn ContainerRuntime,
    options: &BuildOptions,
) -> GraphResult<ContextGraph> {
    let mut graph = ContextGraph::new();
    graph.set_version(&runtime.get_runtime_version()?)?;
    graph.set_metadata(json!({ "timestamp": iso_timestamp_now() }));

    let nodes = orchestrator.get_nodes()?;
    let Some(first_node) = nodes.first() else {
        tracing::debug!("Orchestrator reported no nodes, returning empty graph");
        return Ok(graph);
    };

    let cluster_id = options.cluster_naming.derive(&first_node.id);
    let cluster_guid = ResourceKind::Cluster.resource_id(&cluster_id);
    let mut cluster_annotations = Map::new();
    cluster_annotations.insert(LABEL_KEY.to_string(), Value::String(cluster_id.clone()));
    graph.set_title(cluster_id.as_str());
    graph.add_resource(
        &cluster_guid,
        &cluster_annotations,
        ResourceKind::Cluster,
        &first_node.timestamp,
        None,
    )?;
    tracing::debug!("Building graph for cluster {} ({} nodes)", cluster_id, nodes.len());

    for node in &nodes {
        let node_guid = add_raw_resource(&mut graph, ResourceKind::Node, node)?;
        graph.add_relation(&cluster_guid, &node_guid, RelationKind::Contains, None, None)?;
        discover_node_pods(orchestrator, runtime, &mut graph, node, &node_guid)?;
    }

    for service in orchestrator.get_services()? {
        let service_guid = add_raw_resource(&mut graph, ResourceKind::Service, &service)?;
        graph.add_relation(&cluster_guid, &service_guid, RelationKind::Contains, None, None)?;
        discover_selected_pods(
            orchestrator,
            &mut graph,
            &service,
            &service_guid,
            RelationKind::LoadBalances,
        )?;
    }

    for rcontroller in orchestrator.get_replication_controllers()? {
        let rcontroller_guid =
            add_raw_resource(&mut graph, ResourceKind::ReplicationController, &rcontroller)?;
        graph.add_relation(
            &cluster_guid,
            &rcontroller_guid,
            RelationKind::Contains,
            None,
            None,
        )?;
        discover_selected_pods(
            orchestrator,
            &mut graph,
            &rcontroller,
            &rcontroller_guid,
            RelationKind::Monitors,
        )?;
    }

    tracing::debug!(
        "Graph for cluster {} has {} resources and {} relations",
        cluster_id,
        graph.resources().len(),
        graph.relations().len()
    );

    Ok(graph)
}

/// Add a reported resource under its `"<Type>:<id>"` guid and return the guid
fn add_raw_resource(
    graph: &mut ContextGraph,
    kind: ResourceKind,
    raw: &RawResource,
) -> GraphResult<String> {
    let guid = kind.resource_id(&raw.id);
    graph.add_resource(
        &guid,
        &raw.annotations,
        kind,
        &raw.timestamp,
        raw.properties.clone(),
    )?;
    Ok(guid)
}

/// Discover the pods of a node and everything running inside them
fn discover_node_pods(
    orchestrator: &dyn Orchestrator,
    runtime: &dyn ContainerRuntime,
    graph: &mut ContextGraph,
    node: &RawResource,
    node_guid: &str,
) -> GraphResult<()> {
    for pod in orchestrator.get_pods(&node.id)? {
        let Some(docker_host) = pod.property_str(&["currentState", "host"]) else {
            let msg = format!(
                "Docker host (pod[\"properties\"][\"currentState\"][\"host\"]) not found in pod ID {}",
                pod.id
            );
            tracing::error!("{}", msg);
            return Err(GraphError::Topology(msg));
        };

        let pod_guid = add_raw_resource(graph, ResourceKind::Pod, &pod)?;
        graph.add_relation(node_guid, &pod_guid, RelationKind::Runs, None, None)?;

        for container in runtime.get_containers(docker_host, &pod.id)? {
            let container_guid = add_raw_resource(graph, ResourceKind::Container, &container)?;
            graph.add_relation(&pod_guid, &container_guid, RelationKind::Contains, None, None)?;

            for process in runtime.get_processes(docker_host, &container.id)? {
                let process_guid = add_raw_resource(graph, ResourceKind::Process, &process)?;
                graph.add_relation(
                    &container_guid,
                    &process_guid,
                    RelationKind::Contains,
                    None,
                    None,
                )?;
            }

            discover_container_image(runtime, graph, docker_host, &container, &container_guid)?;
        }
    }

    Ok(())
}

/// Link a container to the image it was created from, if the image is known
fn discover_container_image(
    runtime: &dyn ContainerRuntime,
    graph: &mut ContextGraph,
    docker_host: &str,
    container: &RawResource,
    container_guid: &str,
) -> GraphResult<()> {
    let Some(image_id) = container.property_str(&["Config", "Image"]) else {
        tracing::debug!("Container {} has no Config.Image", container.id);
        return Ok(());
    };

    let Some(image) = runtime.get_image(docker_host, image_id)? else {
        tracing::warn!(
            "Image {} of container {} not found on host {}",
            image_id,
            container.id,
            docker_host
        );
        return Ok(());
    };

    let image_guid = add_raw_resource(graph, ResourceKind::Image, &image)?;
    graph.add_relation(
        container_guid,
        &image_guid,
        RelationKind::CreatedFrom,
        None,
        None,
    )?;

    Ok(())
}

/// Relate a service or replication controller to the pods its selector matches
///
/// Pods are only referenced here; they were added while walking the nodes.
fn discover_selected_pods(
    orchestrator: &dyn Orchestrator,
    graph: &mut ContextGraph,
    owner: &RawResource,
    owner_guid: &str,
    relation: RelationKind,
) -> GraphResult<()> {
    let Some(selector) = owner
        .property(&["labels"])
        .and_then(Value::as_object)
        .filter(|labels| !labels.is_empty())
    else {
        tracing::warn!("{} has no \"labels\" key", owner_guid);
        return Ok(());
    };

    for pod in orchestrator.get_selected_pods(selector)? {
        let pod_guid = ResourceKind::Pod.resource_id(&pod.id);
        graph.add_relation(owner_guid, &pod_guid, relation, None, None)?;
    }

    Ok(())
}
