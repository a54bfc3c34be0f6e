//! Main application configuration
//!
//! This module defines the configuration structures for the combined-events
//! scoring service, including environment variable and file loading and
//! validation.

use crate::types::Mode;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub competition: CompetitionSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and health reports
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Address the HTTP server binds to
    pub host: String,
    /// Port for the HTTP API
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Competition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitionSettings {
    /// Mode used when a request does not name one
    pub default_mode: Mode,
    /// Largest accepted CSV import body
    pub max_import_bytes: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "combined-events".to_string(),
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            http_port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for CompetitionSettings {
    fn default() -> Self {
        Self {
            default_mode: Mode::Decathlon,
            max_import_bytes: 1024 * 1024, // 1 MiB
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(host) = env::var("HTTP_HOST") {
            self.service.host = host;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            self.service.http_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT value: {}", port))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            self.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Competition settings
        if let Ok(mode) = env::var("DEFAULT_MODE") {
            self.competition.default_mode = mode
                .parse()
                .map_err(|_| anyhow!("Invalid DEFAULT_MODE value: {}", mode))?;
        }
        if let Ok(max_bytes) = env::var("MAX_IMPORT_BYTES") {
            self.competition.max_import_bytes = max_bytes
                .parse()
                .map_err(|_| anyhow!("Invalid MAX_IMPORT_BYTES value: {}", max_bytes))?;
        }

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Socket address the HTTP server binds to
    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.service.host, self.service.http_port)
            .parse()
            .with_context(|| {
                format!(
                    "Invalid bind address {}:{}",
                    self.service.host, self.service.http_port
                )
            })
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    // Validate ports
    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }
    config.bind_address()?;

    // Validate timeouts
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    if config.competition.max_import_bytes == 0 {
        return Err(anyhow!("Max import size must be greater than 0"));
    }

    Ok(())
}
