//! Config file location

use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Environment variable that pins the configuration directory
pub const CONFIG_DIR_ENV: &str = "CLUSTERGRAPH_CONFIG_DIR";

/// Directory holding `config.yaml`
///
/// First match wins: `$CLUSTERGRAPH_CONFIG_DIR`, `$XDG_CONFIG_HOME/clustergraph`,
/// `~/.config/clustergraph`, then `./.config/clustergraph` when no home
/// directory can be found. `~/.config` is used on every platform.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = non_empty_env(CONFIG_DIR_ENV) {
        return dir;
    }

    non_empty_env("XDG_CONFIG_HOME")
        .or_else(|| BaseDirs::new().map(|dirs| dirs.home_dir().join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("clustergraph")
}

/// Get the root configuration file path
pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

fn non_empty_env(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
