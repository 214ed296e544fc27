//! # Rover Protocol
//!
//! TCP guidance server for remote rovers speaking a terminator-framed text
//! protocol.
//!
//! Rovers connect over plain TCP, authenticate through a keyed-hash
//! challenge-response, and are steered move by move to the grid origin,
//! where they pick up a secret message and log out. The server never sees
//! the field: everything it knows arrives in the coordinates echoed by
//! each movement reply.
//!
//! ## Features
//! - **Per-byte validation**: hopeless frames fail at the first impossible
//!   byte instead of waiting for a terminator that may never come
//! - **Recharge interrupts**: any expected reply may be preempted by
//!   `RECHARGING` / `FULL POWER`, any number of times
//! - **Bounded sessions**: a read deadline on every byte and a per-session
//!   command budget
//! - **Fixed worker pool**: at most `max_clients` rovers served at once,
//!   never a per-connection spawn
//!
//! ## Example
//! ```no_run
//! use rover_protocol::{transport, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> rover_protocol::Result<()> {
//!     let config = ServerConfig::default();
//!     transport::start_server(&config).await
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod service;
pub mod transport;
pub mod utils;

pub use config::ServerConfig;
pub use error::{ProtocolError, Result};
