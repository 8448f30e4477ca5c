//! Configuration loading logic
//!
//! Handles loading configuration from a file and applying environment
//! overrides on top of it.

use super::{defaults, paths, schema::Config};
use crate::graph::OutputFormat;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers applied
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. The explicit config file if given, otherwise the root config file
    /// 3. Built-in defaults
    ///
    /// An explicit path that does not exist is an error; a missing root
    /// config file is not.
    pub fn load(explicit_path: Option<&Path>) -> Result<Config> {
        let config = match explicit_path {
            Some(path) => Self::load_file(path)?,
            None => {
                let root_path = paths::root_config_path();
                if root_path.exists() {
                    Self::load_file(&root_path)?
                } else {
                    tracing::debug!("No config file at {}, using defaults", root_path.display());
                    Self::load_defaults()
                }
            }
        };

        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load a config file for editing
    ///
    /// Environment overrides are not applied, so saving the result only
    /// persists what the file already holds plus the edit. A missing file
    /// starts from defaults; a file that fails to parse is an error.
    pub fn load_for_edit(path: &Path) -> Result<Config> {
        if path.exists() {
            Self::load_file(path)
        } else {
            tracing::debug!("No config file at {}, editing defaults", path.display());
            Ok(Self::load_defaults())
        }
    }

    /// Validate configuration by loading and checking for errors
    ///
    /// Fails on invalid YAML, invalid value types and on a configured
    /// snapshot file that does not exist.
    pub fn validate(explicit_path: Option<&Path>) -> Result<()> {
        let config = Self::load(explicit_path).context("Failed to load configuration")?;

        if let Some(snapshot) = &config.snapshot {
            if !snapshot.exists() {
                return Err(anyhow::anyhow!(
                    "Configured snapshot file does not exist: {}",
                    snapshot.display()
                ));
            }
        }

        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        defaults::default_config()
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config) -> Config {
        // CLUSTERGRAPH_FORMAT override
        if let Ok(format) = std::env::var("CLUSTERGRAPH_FORMAT") {
            match format.parse::<OutputFormat>() {
                Ok(format) => config.output.format = format,
                Err(e) => tracing::warn!("Ignoring CLUSTERGRAPH_FORMAT: {}", e),
            }
        }

        // CLUSTERGRAPH_SHOW_NODE_LABELS override
        if let Ok(show) = std::env::var("CLUSTERGRAPH_SHOW_NODE_LABELS") {
            if let Ok(val) = show.parse::<bool>() {
                config.output.show_node_labels = val;
            }
        }

        // CLUSTERGRAPH_SNAPSHOT override
        if let Ok(snapshot) = std::env::var("CLUSTERGRAPH_SNAPSHOT") {
            if !snapshot.is_empty() {
                config.snapshot = Some(PathBuf::from(snapshot));
            }
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }
}
