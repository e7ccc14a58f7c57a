//! Application configuration structs
//!
//! Loads configuration from environment variables, with defaults suitable for
//! running the relay out of the box.

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub relay: RelayConfig,
    pub static_pages: StaticConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Relay tuning knobs
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Bound of each connection's outbound frame queue
    #[serde(default = "default_message_buffer")]
    pub message_buffer: usize,
    /// Seconds of inbound silence before a peer is considered dead
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Seconds between transport-level keepalive pings
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,
}

impl RelayConfig {
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    #[must_use]
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }
}

/// Static page configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StaticConfig {
    #[serde(default = "default_static_dir")]
    pub dir: String,
}

// Default value functions
fn default_app_name() -> String {
    "relay-server".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_message_buffer() -> usize {
    100
}

fn default_idle_timeout_secs() -> u64 {
    90
}

fn default_ping_interval_secs() -> u64 {
    45
}

fn default_static_dir() -> String {
    "./static".to_string()
}

/// Read an optional environment variable and parse it, erroring on malformed
/// values instead of silently falling back to the default.
fn env_parse<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Every variable has a default; only malformed values produce an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: match env::var("APP_ENV") {
                    Ok(raw) => match raw.to_lowercase().as_str() {
                        "production" => Environment::Production,
                        "staging" => Environment::Staging,
                        "development" => Environment::Development,
                        _ => return Err(ConfigError::InvalidValue("APP_ENV", raw)),
                    },
                    Err(_) => Environment::default(),
                },
            },
            server: ServerConfig {
                host: env::var("RELAY_HOST").unwrap_or_else(|_| default_host()),
                port: env_parse("RELAY_PORT")?.unwrap_or_else(default_port),
            },
            relay: RelayConfig {
                message_buffer: env_parse("RELAY_MESSAGE_BUFFER")?
                    .unwrap_or_else(default_message_buffer),
                idle_timeout_secs: env_parse("RELAY_IDLE_TIMEOUT_SECS")?
                    .unwrap_or_else(default_idle_timeout_secs),
                ping_interval_secs: env_parse("RELAY_PING_INTERVAL_SECS")?
                    .unwrap_or_else(default_ping_interval_secs),
            },
            static_pages: StaticConfig {
                dir: env::var("STATIC_DIR").unwrap_or_else(|_| default_static_dir()),
            },
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::default(),
            },
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            relay: RelayConfig {
                message_buffer: default_message_buffer(),
                idle_timeout_secs: default_idle_timeout_secs(),
                ping_interval_secs: default_ping_interval_secs(),
            },
            static_pages: StaticConfig {
                dir: default_static_dir(),
            },
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
