//! # Transport Layer
//!
//! TCP socket setup and the fixed worker pool that serves rover sessions.

pub mod server;

pub use server::{bind, serve_with_shutdown, start_server};
