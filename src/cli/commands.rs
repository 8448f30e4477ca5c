//! CLI command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clustergraph::config::{self, Config, ConfigLoader, paths};
use clustergraph::{ComputeOptions, SnapshotSource, compute_graph};

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get configuration value
    Get {
        /// Configuration key (e.g., "output.format", "cluster.naming")
        key: Option<String>,
    },
    /// Set configuration value
    Set {
        /// Configuration key (e.g., "output.format", "cluster.naming")
        key: String,
        /// Configuration value
        value: String,
    },
    /// List all configuration
    List,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

/// Arguments of a graph run, resolved from the command line
#[derive(Debug, Default)]
pub struct GraphArgs {
    pub config: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub format: Option<String>,
    pub no_labels: bool,
}

/// A graph run with command line flags and configuration merged
#[derive(Debug, PartialEq)]
struct GraphRequest {
    snapshot: PathBuf,
    format: String,
    options: ComputeOptions,
}

impl GraphArgs {
    /// Merge the flags over `config`; flags win
    fn resolve(&self, config: &Config) -> Result<GraphRequest> {
        let snapshot = self
            .snapshot
            .clone()
            .or_else(|| config.snapshot.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No snapshot file given (use --snapshot or set 'snapshot' in the config)"
                )
            })?;

        let format = self
            .format
            .clone()
            .unwrap_or_else(|| config.output.format.as_str().to_string());

        let mut options = config.compute_options();
        if self.no_labels {
            options.render.show_node_labels = false;
        }

        Ok(GraphRequest {
            snapshot,
            format,
            options,
        })
    }
}

/// Compute the context graph from a snapshot and print it
///
/// Returns `false` when an error envelope was printed instead of a graph.
pub fn run_graph(args: GraphArgs) -> Result<bool> {
    let config =
        ConfigLoader::load(args.config.as_deref()).context("Failed to load configuration")?;
    let request = args.resolve(&config)?;
    render_graph(&request, &mut io::stdout().lock())
}

fn render_graph(request: &GraphRequest, out: &mut impl Write) -> Result<bool> {
    let source = SnapshotSource::from_path(&request.snapshot)?;

    tracing::debug!(
        "Computing {} graph from {}",
        request.format,
        request.snapshot.display()
    );

    let rendered = compute_graph(&source, &source, &request.format, &request.options);
    write_output(out, &rendered.to_output_string())?;
    Ok(rendered.is_success())
}

/// Write one line of output; a reader that went away is not an error
fn write_output(out: &mut impl Write, text: &str) -> Result<()> {
    match writeln!(out, "{}", text).and_then(|()| out.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("Output closed before the graph was written: {}", e);
            Ok(())
        }
        result => result.context("Failed to write graph output"),
    }
}

/// Set one key in the config file at `path`, keeping everything else in it
fn set_config_entry(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = ConfigLoader::load_for_edit(path)
        .with_context(|| format!("Not updating unreadable config file: {}", path.display()))?;

    config::set_config_value(&mut config, key, value)
        .with_context(|| format!("Failed to set {} = {}", key, value))?;

    ConfigLoader::save(&config, path).context("Failed to save configuration")
}

/// Handle configuration subcommands
pub fn handle_config_command(cmd: ConfigSubcommand, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigSubcommand::Get { key } => {
            // Load config (will use defaults if no file exists)
            let config = ConfigLoader::load(config_path).context("Failed to load configuration")?;

            if let Some(key) = key {
                let value = config::get_config_value(&config, &key)?;
                println!("{}", value);
            } else {
                // Print all config as YAML
                let yaml =
                    serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
                print!("{}", yaml);
            }
        }
        ConfigSubcommand::Set { key, value } => {
            let path = config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(paths::root_config_path);
            set_config_entry(&path, &key, &value)?;
            println!("Configuration saved to: {}", path.display());
        }
        ConfigSubcommand::List => {
            let config = ConfigLoader::load(config_path).context("Failed to load configuration")?;

            let yaml =
                serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
            print!("{}", yaml);
        }
        ConfigSubcommand::Path => {
            let path = config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(paths::root_config_path);
            println!("{}", path.display());
        }
        ConfigSubcommand::Validate => match ConfigLoader::validate(config_path) {
            Ok(()) => {
                println!("Configuration is valid");
            }
            Err(e) => {
                eprintln!("Configuration validation failed: {:#}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clustergraph::{ClusterNaming, OutputFormat};

    fn guestbook_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-resources/guestbook.yaml")
    }

    fn request(format: &str) -> GraphRequest {
        GraphRequest {
            snapshot: guestbook_path(),
            format: format.to_string(),
            options: ComputeOptions::default(),
        }
    }

    #[test]
    fn test_format_falls_back_to_config() {
        let mut config = Config::default();
        config.output.format = OutputFormat::Dot;
        config.snapshot = Some(guestbook_path());

        let resolved = GraphArgs::default().resolve(&config).unwrap();
        assert_eq!(resolved.format, "dot");

        let args = GraphArgs {
            format: Some("resources".to_string()),
            ..Default::default()
        };
        assert_eq!(args.resolve(&config).unwrap().format, "resources");
    }

    #[test]
    fn test_no_labels_overrides_config() {
        let mut config = Config::default();
        config.snapshot = Some(guestbook_path());
        config.cluster.naming = ClusterNaming::NodeId;

        let resolved = GraphArgs::default().resolve(&config).unwrap();
        assert!(resolved.options.render.show_node_labels);
        assert_eq!(resolved.options.build.cluster_naming, ClusterNaming::NodeId);

        let args = GraphArgs {
            no_labels: true,
            ..Default::default()
        };
        assert!(!args.resolve(&config).unwrap().options.render.show_node_labels);

        // Without the flag the config value is kept
        config.output.show_node_labels = false;
        let resolved = GraphArgs::default().resolve(&config).unwrap();
        assert!(!resolved.options.render.show_node_labels);
    }

    #[test]
    fn test_snapshot_resolution() {
        let mut config = Config::default();
        assert!(GraphArgs::default().resolve(&config).is_err());

        config.snapshot = Some(PathBuf::from("/from/config.yaml"));
        let resolved = GraphArgs::default().resolve(&config).unwrap();
        assert_eq!(resolved.snapshot, PathBuf::from("/from/config.yaml"));

        let args = GraphArgs {
            snapshot: Some(PathBuf::from("/from/flag.json")),
            ..Default::default()
        };
        assert_eq!(
            args.resolve(&config).unwrap().snapshot,
            PathBuf::from("/from/flag.json")
        );
    }

    #[test]
    fn test_render_graph_writes_document() {
        let mut out = Vec::new();
        assert!(render_graph(&request("resources"), &mut out).unwrap());

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["resources"].as_array().unwrap().len(), 15);
    }

    #[test]
    fn test_render_graph_reports_failure() {
        let mut out = Vec::new();
        assert!(!render_graph(&request("xml"), &mut out).unwrap());

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["_success"], false);
        assert_eq!(
            value["_error_message"],
            "invalid dump() output_format: xml"
        );
    }

    #[test]
    fn test_render_graph_missing_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let request = GraphRequest {
            snapshot: tmp.path().join("missing.yaml"),
            ..request("dot")
        };
        assert!(render_graph(&request, &mut Vec::new()).is_err());
    }

    struct ClosedOutput(io::ErrorKind);

    impl Write for ClosedOutput {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(self.0))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_output_tolerates_closed_pipe() {
        let mut out = ClosedOutput(io::ErrorKind::BrokenPipe);
        assert!(write_output(&mut out, "digraph{}").is_ok());
        assert!(render_graph(&request("dot"), &mut out).unwrap());

        let mut out = ClosedOutput(io::ErrorKind::PermissionDenied);
        assert!(write_output(&mut out, "digraph{}").is_err());
    }

    #[test]
    fn test_set_config_entry_keeps_other_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(
            &path,
            "output:\n  format: dot\ncluster:\n  naming:\n    rule: fixed\n    name: prod\n",
        )
        .unwrap();

        set_config_entry(&path, "output.showNodeLabels", "false").unwrap();

        let config = ConfigLoader::load_file(&path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Dot);
        assert!(!config.output.show_node_labels);
        assert_eq!(
            config.cluster.naming,
            ClusterNaming::Fixed {
                name: "prod".to_string()
            }
        );
    }

    #[test]
    fn test_set_config_entry_leaves_broken_file_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        let broken = "output:\n  format: dot\n  showNodeLabels: [\n";
        std::fs::write(&path, broken).unwrap();

        assert!(set_config_entry(&path, "snapshot", "/y").is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
    }

    #[test]
    fn test_set_config_entry_creates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.yaml");

        set_config_entry(&path, "snapshot", "/tmp/cluster.json").unwrap();

        let config = ConfigLoader::load_file(&path).unwrap();
        assert_eq!(config.snapshot, Some(PathBuf::from("/tmp/cluster.json")));
        assert_eq!(config.output, Config::default().output);
    }

    #[test]
    fn test_set_config_entry_rejects_bad_value() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        assert!(set_config_entry(&path, "output.format", "xml").is_err());
        assert!(!path.exists());
    }
}
