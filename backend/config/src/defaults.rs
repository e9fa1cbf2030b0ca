//! Config defaults: fills every unset field of a parsed config.

use crate::schema::{HubConfig, LoggingConfig, RelayConfig, ServerConfig};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 8001;

/// Alias mount used behind the application's `/api` reverse proxy.
pub const DEFAULT_GATEWAY_PREFIX: &str = "/api";

pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: HubConfig) -> HubConfig {
    let config = apply_server_defaults(config);
    let config = apply_relay_defaults(config);
    apply_logging_defaults(config)
}

fn apply_server_defaults(mut config: HubConfig) -> HubConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    server
        .bind_address
        .get_or_insert_with(|| DEFAULT_BIND_ADDRESS.to_string());
    server.port.get_or_insert(DEFAULT_PORT);
    server
        .gateway_prefix
        .get_or_insert_with(|| DEFAULT_GATEWAY_PREFIX.to_string());
    config
}

fn apply_relay_defaults(mut config: HubConfig) -> HubConfig {
    let relay = config.relay.get_or_insert_with(RelayConfig::default);
    relay.queue_capacity.get_or_insert(DEFAULT_QUEUE_CAPACITY);
    relay.write_timeout_ms.get_or_insert(DEFAULT_WRITE_TIMEOUT_MS);
    config
}

fn apply_logging_defaults(mut config: HubConfig) -> HubConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_section() {
        let cfg = apply_all_defaults(HubConfig::default());
        let server = cfg.server.unwrap();
        assert_eq!(server.port, Some(DEFAULT_PORT));
        assert_eq!(server.gateway_prefix.as_deref(), Some("/api"));
        assert_eq!(cfg.relay.unwrap().queue_capacity, Some(DEFAULT_QUEUE_CAPACITY));
        assert_eq!(cfg.logging.unwrap().level.as_deref(), Some("info"));
    }

    #[test]
    fn does_not_override_user_values() {
        let cfg = HubConfig {
            server: Some(ServerConfig {
                port: Some(9100),
                ..Default::default()
            }),
            relay: Some(RelayConfig {
                write_timeout_ms: Some(50),
                ..Default::default()
            }),
            ..Default::default()
        };
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.port(), 9100);
        assert_eq!(cfg.write_timeout_ms(), 50);
        assert_eq!(cfg.bind_address(), DEFAULT_BIND_ADDRESS);
    }

    #[test]
    fn leaves_log_dir_unset() {
        let cfg = apply_all_defaults(HubConfig::default());
        assert!(cfg.log_dir().is_none());
    }
}
