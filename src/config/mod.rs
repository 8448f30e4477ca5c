//! Configuration system for clustergraph
//!
//! A YAML configuration file plus environment overrides controls the default
//! output format, DOT rendering and how the cluster is named.

mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{ClusterConfig, Config, OutputConfig};

use crate::topology::ClusterNaming;
use anyhow::Context;
use std::path::PathBuf;

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "output.format" => Ok(config.output.format.to_string()),
        "output.showNodeLabels" => Ok(config.output.show_node_labels.to_string()),
        "cluster.naming" => serde_yaml::to_string(&config.cluster.naming)
            .map(|yaml| yaml.trim_end().to_string())
            .map_err(|e| anyhow::anyhow!("Failed to serialize cluster.naming: {}", e)),
        "snapshot" => Ok(config
            .snapshot
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_default()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "output.format" => {
            config.output.format = value
                .parse()
                .context("output.format must be one of dot, context_graph, resources")?;
        }
        "output.showNodeLabels" => {
            config.output.show_node_labels = value
                .parse()
                .context("output.showNodeLabels must be 'true' or 'false'")?;
        }
        "cluster.naming" => {
            // Either a bare rule name (nodeId, gceProject) or a YAML mapping
            let naming: ClusterNaming = if value.contains(':') {
                serde_yaml::from_str(value)
            } else {
                serde_yaml::from_str(&format!("rule: {}", value))
            }
            .context(
                "cluster.naming must be a rule name or a YAML mapping (e.g., '{rule: fixed, name: prod}')",
            )?;
            config.cluster.naming = naming;
        }
        "snapshot" => {
            config.snapshot = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}
