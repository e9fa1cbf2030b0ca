//! `callhub-config`: hub configuration management.
//!
//! Provides:
//! - Typed config schema (server, relay, logging)
//! - YAML loading with a defaults fallback for a missing file
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{default_config_path, load_config, parse_config, to_yaml, CONFIG_FILE_NAME};
pub use schema::{HubConfig, LoggingConfig, RelayConfig, ServerConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load, substitute env vars, apply defaults and validate a config file.
///
/// Validation warnings are logged; any validation error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<HubConfig> {
    let raw = load_config(path).await?;
    prepare(raw)
}

/// The post-load pipeline of [`load_and_prepare`], for configs built in memory.
pub fn prepare(raw: HubConfig) -> Result<HubConfig> {
    let value = serde_json::to_value(&raw).context("Failed to serialize config for processing")?;
    let value = resolve_env_vars(&value)?;
    let config: HubConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(config);
    check(&config)?;
    Ok(config)
}

/// Validate, logging warnings and failing on errors.
pub fn check(config: &HubConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if let Some(first) = report.errors.first() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        bail!("{} config error(s); first: {first}", report.errors.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prepares_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hub.yaml");
        std::fs::write(&path, "relay:\n  queueCapacity: 8\n").unwrap();

        let cfg = load_and_prepare(&path).await.unwrap();
        assert_eq!(cfg.queue_capacity(), 8);
        assert_eq!(cfg.gateway_prefix(), "/api");
        assert!(cfg.server.is_some());
    }

    #[test]
    fn invalid_config_fails_prepare() {
        let cfg = parse_config("relay:\n  writeTimeoutMs: 0\n").unwrap();
        let err = prepare(cfg).unwrap_err();
        assert!(err.to_string().contains("writeTimeoutMs"));
    }
}
