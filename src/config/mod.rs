pub mod types;

use std::path::{Path, PathBuf};

use crate::error::{RepodeckError, Result};
use types::RepodeckConfig;

/// Environment variable that points at an alternate config file.
pub const CONFIG_ENV: &str = "REPODECK_CONFIG";

/// Load config from `$REPODECK_CONFIG` or the XDG path, falling back to defaults
/// when no file exists.
pub fn load_config() -> Result<RepodeckConfig> {
    let path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(config_path);
    load_config_from(&path)
}

/// Load config from an explicit path. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<RepodeckConfig> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(RepodeckConfig::default());
        }
        Err(e) => {
            return Err(RepodeckError::Config(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };
    toml::from_str(&raw)
        .map_err(|e| RepodeckError::Config(format!("failed to parse {}: {}", path.display(), e)))
}

/// Return XDG config dir (~/.config/repodeck/)
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("repodeck")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Return XDG data dir (~/.local/share/repodeck/)
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("repodeck")
}

/// Return the local registry directory, honouring the config override.
pub fn registry_dir(cfg: &RepodeckConfig) -> PathBuf {
    cfg.storage.registry_path.clone().unwrap_or_else(data_dir)
}

/// Return the shared index database path
pub fn index_path(cfg: &RepodeckConfig) -> PathBuf {
    cfg.storage
        .index_path
        .clone()
        .unwrap_or_else(|| data_dir().join("index.db"))
}
