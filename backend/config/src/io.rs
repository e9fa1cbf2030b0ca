//! Config file discovery and loading.

use crate::schema::HubConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "callhub.yaml";

/// Resolve the config file to use when none is given explicitly.
///
/// `./callhub.yaml` if present, otherwise `~/.callhub/callhub.yaml`.
pub fn default_config_path() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    match dirs::home_dir() {
        Some(home) => home.join(".callhub").join(CONFIG_FILE_NAME),
        None => local,
    }
}

/// Load and parse the config from disk.
///
/// A missing file yields `HubConfig::default()`.
pub async fn load_config(path: &Path) -> Result<HubConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(HubConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse YAML text. An empty document is an empty config.
pub fn parse_config(raw: &str) -> Result<HubConfig> {
    if raw.trim().is_empty() {
        return Ok(HubConfig::default());
    }
    Ok(serde_yaml::from_str(raw)?)
}

/// Render a config back to YAML.
pub fn to_yaml(config: &HubConfig) -> Result<String> {
    serde_yaml::to_string(config).context("Failed to serialize config to YAML")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.yaml")).await.unwrap();
        assert_eq!(cfg, HubConfig::default());
    }

    #[tokio::test]
    async fn reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "server:\n  port: 9200\n").unwrap();

        let cfg = load_config(&path).await.unwrap();
        assert_eq!(cfg.port(), 9200);
    }

    #[tokio::test]
    async fn invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "server: [unclosed\n").unwrap();

        let err = load_config(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(parse_config("\n").unwrap(), HubConfig::default());
    }

    #[test]
    fn yaml_round_trip_keeps_camel_case() {
        let cfg = parse_config("relay:\n  writeTimeoutMs: 500\n").unwrap();
        let yaml = to_yaml(&cfg).unwrap();
        assert!(yaml.contains("writeTimeoutMs: 500"));
    }
}
