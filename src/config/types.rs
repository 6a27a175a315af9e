//! Core configuration types and loading.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::{
    default_command_blacklist, default_connection_timeout, default_max_command_list_size,
    default_max_connections, default_max_line_length, default_server_name,
};
use super::validation::{ValidationError, validate};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", join(.0))]
    Invalid(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server information.
    #[serde(default)]
    pub server: ServerConfig,
    /// Network listen configuration.
    pub listen: ListenConfig,
    /// Protocol behaviour.
    #[serde(default)]
    pub mpd: MpdConfig,
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name used in log output.
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "127.0.0.1:6600").
    pub address: SocketAddr,
}

/// Protocol settings shared by every connection.
#[derive(Debug, Clone, Deserialize)]
pub struct MpdConfig {
    /// When set, clients must send `password` before most commands.
    #[serde(default)]
    pub password: Option<String>,
    /// Concurrent connections accepted; further clients are dropped.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Seconds a connection may stay silent while not idling.
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
    /// Commands refused with a system error.
    #[serde(default = "default_command_blacklist")]
    pub command_blacklist: Vec<String>,
    /// Longest accepted request line in bytes.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// Request bytes an open command list may hold.
    #[serde(default = "default_max_command_list_size")]
    pub max_command_list_size: usize,
}

impl Default for MpdConfig {
    fn default() -> Self {
        Self {
            password: None,
            max_connections: default_max_connections(),
            connection_timeout: default_connection_timeout(),
            command_blacklist: default_command_blacklist(),
            max_line_length: default_max_line_length(),
            max_command_list_size: default_max_command_list_size(),
        }
    }
}

impl MpdConfig {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }

    pub fn is_blacklisted(&self, command: &str) -> bool {
        self.command_blacklist.iter().any(|c| c == command)
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}
