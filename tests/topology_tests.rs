//! Topology building tests
//!
//! Build context graphs from recorded snapshots and check the resources and
//! relations that come out, in order.

use clustergraph::{
    BuildOptions, ClusterNaming, ComputeOptions, GraphError, RelationKind, ResourceKind,
    Snapshot, SnapshotSource, build_context_graph, compute_graph, try_compute_graph,
};
use serde_json::json;
use std::path::PathBuf;

fn guestbook() -> SnapshotSource {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-resources/guestbook.yaml");
    SnapshotSource::from_path(path).unwrap()
}

fn snapshot(value: serde_json::Value) -> SnapshotSource {
    let snapshot: Snapshot = serde_json::from_value(value).unwrap();
    SnapshotSource::new(snapshot)
}

/// One node, one pod, one container built from one image
fn single_pod_snapshot() -> SnapshotSource {
    snapshot(json!({
        "runtimeVersion": "1.6.2",
        "nodes": [
            {"id": "N1", "timestamp": "t0", "annotations": {"label": "N1"}, "properties": {}}
        ],
        "pods": {
            "N1": [{
                "id": "P1",
                "timestamp": "t1",
                "annotations": {"label": "P1"},
                "properties": {"currentState": {"host": "H1"}}
            }]
        },
        "containers": {
            "H1": {
                "P1": [{
                    "id": "C1",
                    "timestamp": "t2",
                    "annotations": {"label": "C1"},
                    "properties": {"Config": {"Image": "IMG1"}}
                }]
            }
        },
        "images": {
            "H1": {
                "IMG1": {"id": "I1", "timestamp": "t3", "annotations": {"label": "I1"}}
            }
        }
    }))
}

fn node_id_naming() -> BuildOptions {
    BuildOptions {
        cluster_naming: ClusterNaming::NodeId,
    }
}

fn relation_triples(graph: &clustergraph::ContextGraph) -> Vec<(String, RelationKind, String)> {
    graph
        .relations()
        .iter()
        .map(|rel| (rel.source.clone(), rel.kind, rel.target.clone()))
        .collect()
}

#[test]
fn test_single_pod_end_to_end() {
    let source = single_pod_snapshot();
    let graph = build_context_graph(&source, &source, &node_id_naming()).unwrap();

    let resources: Vec<(&str, ResourceKind)> = graph
        .resources()
        .iter()
        .map(|res| (res.id.as_str(), res.kind))
        .collect();
    assert_eq!(
        resources,
        vec![
            ("Cluster:N1", ResourceKind::Cluster),
            ("Node:N1", ResourceKind::Node),
            ("Pod:P1", ResourceKind::Pod),
            ("Container:C1", ResourceKind::Container),
            ("Image:I1", ResourceKind::Image),
        ]
    );

    assert_eq!(
        relation_triples(&graph),
        vec![
            ("Cluster:N1".to_string(), RelationKind::Contains, "Node:N1".to_string()),
            ("Node:N1".to_string(), RelationKind::Runs, "Pod:P1".to_string()),
            ("Pod:P1".to_string(), RelationKind::Contains, "Container:C1".to_string()),
            ("Container:C1".to_string(), RelationKind::CreatedFrom, "Image:I1".to_string()),
        ]
    );

    // Cluster takes the first node's timestamp
    assert_eq!(graph.resources()[0].timestamp, "t0");
    // Every entry carries the runtime version
    assert!(
        graph
            .resources()
            .iter()
            .all(|res| res.annotations["createdBy"] == "1.6.2")
    );
    assert!(
        graph
            .relations()
            .iter()
            .all(|rel| rel.annotations.created_by.as_deref() == Some("1.6.2"))
    );
}

#[test]
fn test_guestbook_resources_in_traversal_order() {
    let source = guestbook();
    let graph = build_context_graph(&source, &source, &BuildOptions::default()).unwrap();

    let ids: Vec<&str> = graph.resources().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "Cluster:rising-apricot-840",
            "Node:k8s-guestbook-node-1.c.rising-apricot-840.internal",
            "Pod:redis-master",
            "Container:3b1c9a2e",
            "Process:3b1c9a2e/1",
            "Image:0a5f6b7c8d",
            "Node:k8s-guestbook-node-2.c.rising-apricot-840.internal",
            "Pod:frontend-1",
            "Container:9f00aa11",
            "Image:1e2d3c4b5a",
            "Pod:frontend-2",
            "Container:9f00aa22",
            "Service:frontend",
            "Service:kubernetes",
            "ReplicationController:frontend-controller",
        ]
    );
    assert_eq!(graph.title(), Some("rising-apricot-840"));
}

#[test]
fn test_guestbook_relations() {
    let source = guestbook();
    let graph = build_context_graph(&source, &source, &BuildOptions::default()).unwrap();

    assert_eq!(graph.relations().len(), 19);

    // Both frontend containers point at the shared image, which is stored once
    let created_from: Vec<&str> = graph
        .relations()
        .iter()
        .filter(|rel| rel.kind == RelationKind::CreatedFrom)
        .map(|rel| rel.target.as_str())
        .collect();
    assert_eq!(
        created_from,
        vec!["Image:0a5f6b7c8d", "Image:1e2d3c4b5a", "Image:1e2d3c4b5a"]
    );

    let load_balanced: Vec<&str> = graph
        .relations()
        .iter()
        .filter(|rel| rel.kind == RelationKind::LoadBalances)
        .map(|rel| rel.target.as_str())
        .collect();
    assert_eq!(load_balanced, vec!["Pod:frontend-1", "Pod:frontend-2"]);

    let monitored: Vec<(&str, &str)> = graph
        .relations()
        .iter()
        .filter(|rel| rel.kind == RelationKind::Monitors)
        .map(|rel| (rel.source.as_str(), rel.target.as_str()))
        .collect();
    assert_eq!(
        monitored,
        vec![
            ("ReplicationController:frontend-controller", "Pod:frontend-1"),
            ("ReplicationController:frontend-controller", "Pod:frontend-2"),
        ]
    );

    // The selector-less kubernetes service is only contained by the cluster
    assert!(
        graph
            .relations()
            .iter()
            .filter(|rel| rel.source == "Service:kubernetes")
            .count()
            == 0
    );
}

#[test]
fn test_missing_host_fails_whole_build() {
    let source = snapshot(json!({
        "runtimeVersion": "1.6.2",
        "nodes": [{"id": "N1", "timestamp": "t0", "annotations": {"label": "N1"}}],
        "pods": {
            "N1": [{"id": "P1", "timestamp": "t1", "annotations": {"label": "P1"}, "properties": {}}]
        }
    }));

    let err = build_context_graph(&source, &source, &BuildOptions::default()).unwrap_err();
    assert!(matches!(err, GraphError::Topology(_)));

    let rendered = compute_graph(&source, &source, "context_graph", &ComputeOptions::default());
    assert!(!rendered.is_success());
    assert!(rendered.as_error().unwrap().error_message.contains("P1"));
}

#[test]
fn test_empty_cluster_short_circuit() {
    let source = snapshot(json!({"runtimeVersion": "1.6.2"}));

    let graph = build_context_graph(&source, &source, &BuildOptions::default()).unwrap();
    assert!(graph.is_empty());
    assert_eq!(graph.version(), Some("1.6.2"));
    assert!(graph.metadata().is_some());

    let rendered =
        try_compute_graph(&source, &source, "context_graph", &ComputeOptions::default()).unwrap();
    let value = rendered.as_document().unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["resources"], json!([]));
    assert_eq!(value["relations"], json!([]));
}

#[test]
fn test_missing_label_is_a_validation_error() {
    let source = snapshot(json!({
        "runtimeVersion": "1.6.2",
        "nodes": [{"id": "N1", "timestamp": "t0", "annotations": {}}]
    }));

    let err = build_context_graph(&source, &source, &node_id_naming()).unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));
}

#[test]
fn test_missing_runtime_version_is_a_source_error() {
    let source = snapshot(json!({
        "nodes": [{"id": "N1", "timestamp": "t0", "annotations": {"label": "N1"}}]
    }));

    let err = build_context_graph(&source, &source, &BuildOptions::default()).unwrap_err();
    assert!(matches!(err, GraphError::Source(_)));
}

#[test]
fn test_compute_graph_dot() {
    let source = single_pod_snapshot();
    let options = ComputeOptions {
        build: node_id_naming(),
        ..Default::default()
    };

    let rendered = compute_graph(&source, &source, "dot", &options);
    assert!(rendered.is_success());
    insta::assert_snapshot!(rendered.as_dot().unwrap(), @r#"digraph{"Cluster:N1"[label="Cluster:N1",color=black];"Node:N1"[label="Node:N1",color=red];"Pod:P1"[label="Pod:P1",color=blue];"Container:C1"[label="Container:C1",color=green];"Image:I1"[label="Image:I1",color=maroon];"Cluster:N1"->"Node:N1"[label="contains"];"Node:N1"->"Pod:P1"[label="runs"];"Pod:P1"->"Container:C1"[label="contains"];"Container:C1"->"Image:I1"[label="createdFrom"]}"#);
}

#[test]
fn test_compute_graph_resources_format() {
    let source = single_pod_snapshot();
    let rendered = compute_graph(&source, &source, "resources", &ComputeOptions::default());

    let value = rendered.as_document().unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["resources"].as_array().unwrap().len(), 5);
    assert!(value.get("relations").is_none());
}

#[test]
fn test_compute_graph_invalid_format() {
    let source = single_pod_snapshot();
    let err = try_compute_graph(&source, &source, "xml", &ComputeOptions::default()).unwrap_err();
    assert!(matches!(err, GraphError::InvalidFormat(_)));

    let rendered = compute_graph(&source, &source, "xml", &ComputeOptions::default());
    assert!(!rendered.is_success());
    let value = rendered.as_error().unwrap().to_json();
    assert_eq!(value["_success"], false);
    assert!(value["_error_message"].as_str().unwrap().contains("xml"));
}
