//! # Error Types
//!
//! Error handling for the rover guidance protocol.
//!
//! This module defines all error variants that can occur while serving a
//! rover, from low-level I/O failures to protocol violations.
//!
//! ## Error Categories
//! - **I/O Errors**: socket failures and closed connections
//! - **Protocol Errors**: malformed frames, out-of-phase messages, timeouts
//! - **Authentication Errors**: unknown key IDs, confirmation mismatches
//! - **Configuration Errors**: invalid server settings
//!
//! Syntax and logic violations map to wire replies (`301 SYNTAX ERROR`,
//! `302 LOGIC ERROR`); the rest terminate the session silently.
//!
//! ## Example Usage
//! ```rust
//! use rover_protocol::error::{ProtocolError, Result};
//!
//! fn parse_port(raw: &str) -> Result<u16> {
//!     raw.parse()
//!         .map_err(|_| ProtocolError::ConfigError(format!("invalid port: {raw}")))
//! }
//!
//! assert!(parse_port("2022").is_ok());
//! assert!(parse_port("rover").is_err());
//! ```

use std::io;
use thiserror::Error;

// ProtocolError is the primary error type for all protocol operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Timeout occurred")]
    Timeout,

    #[error("Malformed message")]
    Syntax,

    #[error("Message valid but not allowed in this phase")]
    Logic,

    #[error("Key ID out of range")]
    KeyOutOfRange,

    #[error("Confirmation key mismatch")]
    LoginFailed,

    #[error("Session command budget exhausted")]
    CommandLimitExceeded,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
