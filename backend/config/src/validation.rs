//! Config validation with path-qualified messages.

use crate::schema::HubConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// Errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &HubConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_relay(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_server(config: &HubConfig, report: &mut ValidationReport) {
    let Some(server) = &config.server else { return };
    if let Some(port) = server.port {
        if port == 0 {
            report.error("server.port", "port must be > 0");
        } else if port < 1024 && port != 80 && port != 443 {
            report.warn(
                "server.port",
                format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
            );
        }
    }
    if let Some(addr) = &server.bind_address {
        if addr.trim().is_empty() {
            report.error("server.bindAddress", "bind address cannot be empty");
        }
    }
    if let Some(prefix) = &server.gateway_prefix {
        if prefix.is_empty() {
            report.error("server.gatewayPrefix", "gateway prefix cannot be empty");
        } else if !prefix.starts_with('/') {
            report.error("server.gatewayPrefix", "gateway prefix must start with '/'");
        } else if prefix.len() > 1 && prefix.ends_with('/') {
            report.error("server.gatewayPrefix", "gateway prefix must not end with '/'");
        } else if prefix == "/" {
            report.warn("server.gatewayPrefix", "prefix '/' adds no second mount");
        }
    }
}

fn validate_relay(config: &HubConfig, report: &mut ValidationReport) {
    let Some(relay) = &config.relay else { return };
    if relay.queue_capacity == Some(0) {
        report.error("relay.queueCapacity", "queueCapacity must be >= 1");
    }
    if relay.write_timeout_ms == Some(0) {
        report.error("relay.writeTimeoutMs", "writeTimeoutMs must be >= 1");
    }
}

fn validate_logging(config: &HubConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        if level.trim().is_empty() {
            report.error("logging.level", "log level cannot be empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::{RelayConfig, ServerConfig};

    #[test]
    fn defaulted_config_is_valid() {
        let report = validate(&apply_all_defaults(HubConfig::default()));
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn zero_queue_capacity_is_error() {
        let cfg = HubConfig {
            relay: Some(RelayConfig {
                queue_capacity: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "relay.queueCapacity");
    }

    #[test]
    fn prefix_shape_is_checked() {
        for bad in ["api", "/api/", ""] {
            let cfg = HubConfig {
                server: Some(ServerConfig {
                    gateway_prefix: Some(bad.to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            };
            assert!(!validate(&cfg).is_valid(), "prefix {bad:?} accepted");
        }
    }

    #[test]
    fn privileged_port_warns() {
        let cfg = HubConfig {
            server: Some(ServerConfig {
                port: Some(81),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }
}
