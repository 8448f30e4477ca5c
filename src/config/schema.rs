//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use crate::context::ComputeOptions;
use crate::graph::{OutputFormat, RenderOptions};
use crate::topology::{BuildOptions, ClusterNaming};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Cluster configuration
    #[serde(default)]
    pub cluster: ClusterConfig,

    /// Snapshot file read when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    /// Default output format (dot, context_graph, resources)
    #[serde(default)]
    pub format: OutputFormat,

    /// Label DOT nodes with `Type:label` instead of filling them
    #[serde(default = "default_true")]
    pub show_node_labels: bool,
}

/// Cluster configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Rule deriving the cluster name from the first node id
    #[serde(default)]
    pub naming: ClusterNaming,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            show_node_labels: default_true(),
        }
    }
}

impl Config {
    /// Options for a compute request based on this configuration
    pub fn compute_options(&self) -> ComputeOptions {
        ComputeOptions {
            build: BuildOptions {
                cluster_naming: self.cluster.naming.clone(),
            },
            render: RenderOptions {
                show_node_labels: self.output.show_node_labels,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.output.format, OutputFormat::ContextGraph);
        assert!(config.output.show_node_labels);
        assert_eq!(config.cluster.naming, ClusterNaming::GceProject);
        assert!(config.snapshot.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("showNodeLabels"));
        assert!(yaml.contains("format: context_graph"));
        assert!(yaml.contains("rule: gceProject"));
        assert!(!yaml.contains("snapshot"));
    }

    #[test]
    fn test_config_deserialization() {
        let yaml = r#"
output:
  format: dot
  showNodeLabels: false
cluster:
  naming:
    rule: fixed
    name: production
snapshot: /tmp/cluster.json
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.output.format, OutputFormat::Dot);
        assert!(!config.output.show_node_labels);
        assert_eq!(
            config.cluster.naming,
            ClusterNaming::Fixed {
                name: "production".to_string()
            }
        );
        assert_eq!(config.snapshot, Some(PathBuf::from("/tmp/cluster.json")));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = serde_yaml::from_str("output:\n  format: resources\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Resources);
        assert!(config.output.show_node_labels);
        assert_eq!(config.cluster, ClusterConfig::default());
    }

    #[test]
    fn test_compute_options() {
        let mut config = Config::default();
        config.output.show_node_labels = false;
        let options = config.compute_options();
        assert!(!options.render.show_node_labels);
        assert_eq!(options.build.cluster_naming, ClusterNaming::GceProject);
    }
}
