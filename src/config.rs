//! # Configuration Management
//!
//! Centralized configuration for the rover guidance server.
//!
//! This module provides structured configuration for the listener and the
//! per-session command budget.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Environment overrides via `from_env()` (`ROVER_*` variables)
//! - Direct instantiation with defaults
//!
//! The protocol's read deadlines are not configurable: they are fixed by the
//! wire contract (see [`crate::utils::timeout`]).

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default listen port
pub const DEFAULT_PORT: u16 = 2022;

/// Default listen host
pub const DEFAULT_HOST: &str = "localhost";

/// Default number of concurrently served rovers
pub const DEFAULT_MAX_CLIENTS: usize = 12;

/// Default per-session command budget (moves and turns)
pub const DEFAULT_COMMAND_LIMIT: u32 = 10_000;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host name or address to listen on
    pub host: String,

    /// TCP port to listen on
    pub port: u16,

    /// Number of rovers served concurrently; further connections queue at
    /// the socket until a worker frees up
    pub max_clients: usize,

    /// Maximum number of movement commands a single session may issue
    pub command_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            max_clients: DEFAULT_MAX_CLIENTS,
            command_limit: DEFAULT_COMMAND_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override settings from `ROVER_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("ROVER_HOST") {
            self.host = host;
        }

        if let Ok(port) = std::env::var("ROVER_PORT") {
            if let Ok(val) = port.parse::<u16>() {
                self.port = val;
            }
        }

        if let Ok(clients) = std::env::var("ROVER_MAX_CLIENTS") {
            if let Ok(val) = clients.parse::<usize>() {
                self.max_clients = val;
            }
        }

        if let Ok(limit) = std::env::var("ROVER_COMMAND_LIMIT") {
            if let Ok(val) = limit.parse::<u32>() {
                self.command_limit = val;
            }
        }
    }

    /// The `host:port` pair the listener binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.host.is_empty() {
            errors.push("Host cannot be empty".to_string());
        }

        if self.port == 0 {
            errors.push("Port must be greater than 0".to_string());
        }

        if self.max_clients == 0 {
            errors.push("Max clients must be greater than 0".to_string());
        } else if self.max_clients > 10_000 {
            errors.push(format!(
                "Max clients very high: {} (each holds a worker for a whole session)",
                self.max_clients
            ));
        }

        if self.command_limit == 0 {
            errors.push("Command limit must be greater than 0".to_string());
        } else if self.command_limit < 64 {
            errors.push(format!(
                "Command limit too small: {} (a remote rover may need dozens of moves)",
                self.command_limit
            ));
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}
