//! callhub configuration schema.
//!
//! Every field is optional in the file; [`crate::defaults`] fills the gaps and
//! the accessors below fall back to the same constants.

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_BIND_ADDRESS, DEFAULT_GATEWAY_PREFIX, DEFAULT_LOG_LEVEL, DEFAULT_PORT,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_WRITE_TIMEOUT_MS,
};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubConfig {
    /// Listener and routing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Delivery to clients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay: Option<RelayConfig>,

    /// Logging output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Second mount point for every route, for deployments behind the
    /// application gateway (e.g. `/api`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    /// Frames buffered per connection before further frames are dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_capacity: Option<usize>,
    /// Upper bound on one socket write, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
    /// Directory for rolling NDJSON log files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl HubConfig {
    pub fn bind_address(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind_address.as_deref())
            .unwrap_or(DEFAULT_BIND_ADDRESS)
    }

    pub fn port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn gateway_prefix(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.gateway_prefix.as_deref())
            .unwrap_or(DEFAULT_GATEWAY_PREFIX)
    }

    pub fn queue_capacity(&self) -> usize {
        self.relay
            .as_ref()
            .and_then(|r| r.queue_capacity)
            .unwrap_or(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn write_timeout_ms(&self) -> u64 {
        self.relay
            .as_ref()
            .and_then(|r| r.write_timeout_ms)
            .unwrap_or(DEFAULT_WRITE_TIMEOUT_MS)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }

    /// `bind_address:port`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address(), self.port())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
server:
  bindAddress: 127.0.0.1
  port: 9000
  gatewayPrefix: /gw
relay:
  queueCapacity: 16
  writeTimeoutMs: 2500
logging:
  level: debug
  json: true
"#;
        let cfg: HubConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.listen_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.gateway_prefix(), "/gw");
        assert_eq!(cfg.queue_capacity(), 16);
        assert_eq!(cfg.write_timeout_ms(), 2500);
        assert_eq!(cfg.log_level(), "debug");
        assert!(cfg.log_json());
        assert!(cfg.log_dir().is_none());
    }

    #[test]
    fn accessors_fall_back_to_defaults() {
        let cfg = HubConfig::default();
        assert_eq!(cfg.port(), DEFAULT_PORT);
        assert_eq!(cfg.gateway_prefix(), "/api");
        assert_eq!(cfg.queue_capacity(), DEFAULT_QUEUE_CAPACITY);
        assert!(!cfg.log_json());
    }
}
