//! # Connection Services
//!
//! Per-rover stream handling above the raw socket.
//!
//! ## Components
//! - **Connection**: codec-framed stream with per-byte deadlines and
//!   transparent recharge interrupts

pub mod connection;

pub use connection::Connection;
