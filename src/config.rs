//! Configuration module for chatrelay.

use serde::Deserialize;
use std::path::Path;

use crate::{RelayError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve the browser client.
    #[serde(default = "default_serve_static")]
    pub serve_static: bool,
    /// Directory holding the browser client.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_serve_static() -> bool {
    true
}

fn default_static_path() -> String {
    "static".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            serve_static: default_serve_static(),
            static_path: default_static_path(),
        }
    }
}

/// How routed messages are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Publish to `topic/<channel>`, one room per channel.
    #[default]
    Dynamic,
    /// Publish every message to a single fixed address.
    Fixed,
}

impl Topology {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Dynamic => "dynamic",
            Topology::Fixed => "fixed",
        }
    }

    /// Parse a topology name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dynamic" => Some(Topology::Dynamic),
            "fixed" => Some(Topology::Fixed),
            _ => None,
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relay (routing) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Delivery topology.
    #[serde(default)]
    pub topology: Topology,
    /// Address used by the fixed topology.
    #[serde(default = "default_fixed_address")]
    pub fixed_address: String,
    /// Number of messages buffered per address before slow subscribers lag.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_fixed_address() -> String {
    "topic/public".to_string()
}

fn default_channel_capacity() -> usize {
    100
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            topology: Topology::default(),
            fixed_address: default_fixed_address(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/chatrelay.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Relay configuration.
    #[serde(default)]
    pub relay: RelayConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(RelayError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| RelayError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CHATRELAY_HOST`: bind address
    /// - `CHATRELAY_PORT`: listen port
    /// - `CHATRELAY_TOPOLOGY`: `dynamic` or `fixed`
    ///
    /// Empty or unparsable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("CHATRELAY_HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }

        if let Ok(port) = std::env::var("CHATRELAY_PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) if port.is_empty() => {}
                Err(e) => tracing::warn!("Ignoring CHATRELAY_PORT={port}: {e}"),
            }
        }

        if let Ok(topology) = std::env::var("CHATRELAY_TOPOLOGY") {
            if let Some(topology) = Topology::parse(&topology) {
                self.relay.topology = topology;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The fixed topology is selected but `fixed_address` is empty
    /// - `channel_capacity` is zero
    pub fn validate(&self) -> Result<()> {
        if self.relay.topology == Topology::Fixed && self.relay.fixed_address.trim().is_empty() {
            return Err(RelayError::Config(
                "relay.topology is \"fixed\" but relay.fixed_address is empty".to_string(),
            ));
        }
        if self.relay.channel_capacity == 0 {
            return Err(RelayError::Config(
                "relay.channel_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.server.cors_origins.is_empty());
        assert!(config.server.serve_static);
        assert_eq!(config.server.static_path, "static");

        assert_eq!(config.relay.topology, Topology::Dynamic);
        assert_eq!(config.relay.fixed_address, "topic/public");
        assert_eq!(config.relay.channel_capacity, 100);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/chatrelay.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
cors_origins = ["http://localhost:4200"]
serve_static = false
static_path = "web/client"

[relay]
topology = "fixed"
fixed_address = "topic/lobby"
channel_capacity = 32

[logging]
level = "debug"
file = "custom/logs/relay.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:4200"]);
        assert!(!config.server.serve_static);
        assert_eq!(config.server.static_path, "web/client");

        assert_eq!(config.relay.topology, Topology::Fixed);
        assert_eq!(config.relay.fixed_address, "topic/lobby");
        assert_eq!(config.relay.channel_capacity, 32);

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/relay.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[relay]
topology = "fixed"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.relay.topology, Topology::Fixed);
        assert_eq!(config.relay.fixed_address, "topic/public");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.relay.topology, Topology::Dynamic);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(RelayError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_parse_unknown_topology() {
        let toml = r#"
[relay]
topology = "mesh"
"#;
        assert!(Config::parse(toml).is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");

        assert!(matches!(result, Err(RelayError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9123\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 9123);
    }

    #[test]
    fn test_load_with_env_applies_overrides() {
        let original = std::env::var("CHATRELAY_HOST").ok();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nhost = \"10.0.0.1\"\n").unwrap();

        std::env::set_var("CHATRELAY_HOST", "127.0.0.1");
        let config = Config::load_with_env(&path).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");

        if let Some(val) = original {
            std::env::set_var("CHATRELAY_HOST", val);
        } else {
            std::env::remove_var("CHATRELAY_HOST");
        }
    }

    #[test]
    fn test_load_with_env_missing_file() {
        assert!(matches!(
            Config::load_with_env("nonexistent.toml"),
            Err(RelayError::Io(_))
        ));
    }

    #[test]
    fn test_topology_parse() {
        assert_eq!(Topology::parse("dynamic"), Some(Topology::Dynamic));
        assert_eq!(Topology::parse(" FIXED "), Some(Topology::Fixed));
        assert_eq!(Topology::parse(""), None);
        assert_eq!(Topology::Fixed.to_string(), "fixed");
    }

    #[test]
    fn test_apply_env_overrides_topology() {
        let original = std::env::var("CHATRELAY_TOPOLOGY").ok();

        std::env::set_var("CHATRELAY_TOPOLOGY", "fixed");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.relay.topology, Topology::Fixed);

        std::env::set_var("CHATRELAY_TOPOLOGY", "bogus");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.relay.topology, Topology::Dynamic);

        if let Some(val) = original {
            std::env::set_var("CHATRELAY_TOPOLOGY", val);
        } else {
            std::env::remove_var("CHATRELAY_TOPOLOGY");
        }
    }

    #[test]
    fn test_apply_env_overrides_port() {
        let original = std::env::var("CHATRELAY_PORT").ok();

        std::env::set_var("CHATRELAY_PORT", "9999");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.server.port, 9999);

        std::env::set_var("CHATRELAY_PORT", "not-a-port");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.server.port, 8080);

        if let Some(val) = original {
            std::env::set_var("CHATRELAY_PORT", val);
        } else {
            std::env::remove_var("CHATRELAY_PORT");
        }
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_fixed_without_address() {
        let mut config = Config::default();
        config.relay.topology = Topology::Fixed;
        config.relay.fixed_address = "  ".to_string();

        let result = config.validate();
        if let Err(RelayError::Config(msg)) = result {
            assert!(msg.contains("fixed_address"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_validate_zero_capacity() {
        let mut config = Config::default();
        config.relay.channel_capacity = 0;
        assert!(config.validate().is_err());
    }
}
