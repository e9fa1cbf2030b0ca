//! Runtime overrides layered on top of the config file.
//!
//! Precedence: file < `CALLHUB_*` environment < command-line flags.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use callhub_config::{HubConfig, LoggingConfig, ServerConfig};
use callhub_gateway::RelaySettings;
use callhub_logging::LogOptions;

/// Apply `CALLHUB_*` variables from `env`. Unparseable values are ignored.
pub fn apply_env_overrides(mut config: HubConfig, env: &HashMap<String, String>) -> HubConfig {
    let var = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();

    let server = config.server.get_or_insert_with(ServerConfig::default);
    if let Some(bind) = var("CALLHUB_BIND") {
        server.bind_address = Some(bind);
    }
    if let Some(port) = var("CALLHUB_PORT").and_then(|p| p.parse().ok()) {
        server.port = Some(port);
    }
    if let Some(prefix) = var("CALLHUB_GATEWAY_PREFIX") {
        server.gateway_prefix = Some(prefix);
    }

    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if let Some(level) = var("CALLHUB_LOG_LEVEL") {
        logging.level = Some(level);
    }
    if let Some(json) = var("CALLHUB_LOG_JSON").and_then(|v| parse_flag(&v)) {
        logging.json = Some(json);
    }
    if let Some(dir) = var("CALLHUB_LOG_DIR") {
        logging.dir = Some(dir);
    }

    config
}

/// Apply `serve` flags.
pub fn apply_cli_overrides(
    mut config: HubConfig,
    port: Option<u16>,
    bind: Option<String>,
) -> HubConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    if port.is_some() {
        server.port = port;
    }
    if bind.is_some() {
        server.bind_address = bind;
    }
    config
}

pub fn relay_settings(config: &HubConfig) -> RelaySettings {
    RelaySettings {
        queue_capacity: config.queue_capacity(),
        write_timeout: Duration::from_millis(config.write_timeout_ms()),
    }
}

pub fn log_options(config: &HubConfig) -> LogOptions {
    LogOptions {
        level: config.log_level().to_string(),
        json: config.log_json(),
        dir: config.log_dir().map(PathBuf::from),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
