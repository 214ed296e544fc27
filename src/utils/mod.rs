//! # Utility Modules
//!
//! Supporting utilities used throughout the protocol implementation.
//!
//! ## Components
//! - **Logging**: console subscriber setup for the server binary
//! - **Timeout**: per-byte read deadlines and async timeout wrappers

pub mod logging;
pub mod timeout;
