//! # Logging Setup
//!
//! Console subscriber initialization for the server binary.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the binary (or the host application) so embedders keep control
//! of their own logging pipeline.

use tracing_subscriber::EnvFilter;

/// Install the console subscriber.
///
/// Filtering follows `RUST_LOG` when set and falls back to the given default
/// directive (typically `"info"`). Calling this twice panics, so it belongs
/// in `main`, not in library code.
pub fn init(default_directive: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_target(false)
        .init();
}
