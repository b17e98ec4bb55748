//! Configuration settings for the lobby daemon.

use std::path::Path;

use serde::Deserialize;

use crate::error::LobbyError;
use crate::roster::{EasytierId, PlayerIdentity};

/// Main configuration structure for the daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub identity: IdentityConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Listen address configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to listen on.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// The operator's own identity, as supplied by the identity collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Stable opaque machine identifier. Required.
    pub machine_id: String,
    /// Display name; blank or absent falls back to `Player_<machine_id>`.
    pub player_name: Option<String>,
    /// Mesh node id, numeric or string.
    pub easytier_id: Option<EasytierId>,
}

/// Downstream game service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameConfig {
    /// Port of the game service, if it is already known at startup.
    /// Can also be set at runtime through the listener.
    pub port: Option<u16>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Limits configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum declared request body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Maximum concurrent connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// How long to wait for connections to drain on shutdown.
    #[serde(default = "default_drain_seconds")]
    pub shutdown_drain_seconds: u64,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3939
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_max_body_size() -> usize {
    1_048_576 // 1MB
}

fn default_max_connections() -> usize {
    32
}

fn default_drain_seconds() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: default_max_body_size(),
            max_connections: default_max_connections(),
            shutdown_drain_seconds: default_drain_seconds(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LobbyError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LobbyError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| LobbyError::Config {
            message: format!("Failed to parse config file '{}': {}", path.display(), e),
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate the settings.
    fn validate(&self) -> Result<(), LobbyError> {
        if self.identity.machine_id.trim().is_empty() {
            return Err(LobbyError::Config {
                message: "identity.machine_id must not be empty".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(LobbyError::Config {
                message: format!(
                    "Invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(LobbyError::Config {
                message: format!(
                    "Invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        if self.limits.max_body_size == 0 {
            return Err(LobbyError::Config {
                message: "limits.max_body_size must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// The operator's identity as announced to peers.
    pub fn identity(&self) -> PlayerIdentity {
        PlayerIdentity::new(
            self.identity.player_name.clone(),
            self.identity.machine_id.clone(),
            self.identity.easytier_id.clone(),
        )
    }
}
