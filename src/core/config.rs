//! Application configuration management
//!
//! This module handles loading and validating configuration from TOML files.
//! Everything is validated at startup so a bad file fails fast.

use crate::models::sensor::SensorKind;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default modem HTTP port
const DEFAULT_MODEM_PORT: u16 = 80;

/// Default seconds between background refreshes
const DEFAULT_SCAN_INTERVAL: u64 = 30;

/// Default throttle window in seconds
const DEFAULT_MIN_INTERVAL: u64 = 10;

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 15;

/// Default server port
const DEFAULT_PORT: u16 = 8083;

#[derive(Debug, Clone, Deserialize)]
pub struct ModemConfig {
    pub host: String,
    #[serde(default = "default_modem_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,
    #[serde(default = "default_min_interval")]
    pub min_interval: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            scan_interval: DEFAULT_SCAN_INTERVAL,
            min_interval: DEFAULT_MIN_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_modem_port() -> u16 {
    DEFAULT_MODEM_PORT
}

fn default_scan_interval() -> u64 {
    DEFAULT_SCAN_INTERVAL
}

fn default_min_interval() -> u64 {
    DEFAULT_MIN_INTERVAL
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    pub modem: ModemConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Application configuration loaded from TOML files
#[derive(Debug, Clone)]
pub struct Config {
    /// Modem address
    pub modem_host: String,

    /// Modem HTTP port
    pub modem_port: u16,

    /// Administrator credentials for the login form
    pub username: String,
    pub password: String,

    /// Sensors to expose, in configuration order
    pub sensors: Vec<SensorKind>,

    /// Seconds between background refreshes
    pub scan_interval: u64,

    /// Minimum seconds between two refresh attempts
    pub min_interval: u64,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Logging level
    pub log_level: String,
}

impl Config {
    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The TOML file cannot be read or parsed
    /// - Required configuration values are missing
    /// - Configuration values are invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;

        let modem = config.modem;
        if modem.host.trim().is_empty() {
            bail!("modem.host must not be empty");
        }
        if modem.username.trim().is_empty() {
            bail!("modem.username must not be empty");
        }
        if modem.port == 0 {
            bail!("modem.port must be a positive integer");
        }
        if config.polling.scan_interval == 0 {
            bail!("polling.scan_interval must be a positive integer");
        }
        if config.polling.request_timeout == 0 {
            bail!("polling.request_timeout must be a positive integer");
        }

        let sensors = resolve_sensors(&modem.resources)?;

        Ok(Config {
            modem_host: modem.host,
            modem_port: modem.port,
            username: modem.username,
            password: modem.password,
            sensors,
            scan_interval: config.polling.scan_interval,
            min_interval: config.polling.min_interval,
            request_timeout: config.polling.request_timeout,
            host: config.server.host,
            port: config.server.port,
            log_level: config.server.log_level,
        })
    }

    /// Load configuration from environment and config file
    ///
    /// Looks for config.toml in current directory by default
    pub fn from_env() -> Result<Self> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::from_file(config_path)
    }

    /// Base URL of the modem web interface
    pub fn modem_base_url(&self) -> String {
        format!("http://{}:{}", self.modem_host, self.modem_port)
    }
}

/// Map configured keys to sensors; an empty list selects all of them
fn resolve_sensors(resources: &[String]) -> Result<Vec<SensorKind>> {
    if resources.is_empty() {
        return Ok(SensorKind::ALL.to_vec());
    }

    let mut sensors = Vec::with_capacity(resources.len());
    for key in resources {
        let kind = SensorKind::from_key(key)
            .with_context(|| format!("Unknown sensor type in modem.resources: {}", key))?;
        if !sensors.contains(&kind) {
            sensors.push(kind);
        }
    }
    Ok(sensors)
}
