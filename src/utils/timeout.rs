//! # Timeout Utilities
//!
//! Deadline constants and helpers for timed protocol exchanges.
//!
//! The protocol allows a rover one second of silence between bytes; a rover
//! that has announced a recharge gets five. Both windows apply per byte, not
//! per frame, so a peer trickling a frame slower than the deadline is cut
//! off even though data keeps arriving.

use crate::error::{ProtocolError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Deadline for each byte of an ordinary client message
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Extended deadline while the rover recharges
pub const RECHARGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Run a future against a deadline, mapping expiry to `ProtocolError::Timeout`
pub async fn with_timeout_error<F, T>(fut: F, window: Duration) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout(window, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProtocolError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_expiry_maps_to_timeout_error() {
        let result: Result<()> = with_timeout_error(
            async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            },
            RESPONSE_TIMEOUT,
        )
        .await;

        assert!(matches!(result, Err(ProtocolError::Timeout)));
    }

    #[tokio::test]
    async fn test_completed_future_passes_through() {
        let result = with_timeout_error(async { Ok(7u8) }, RESPONSE_TIMEOUT).await;
        assert!(matches!(result, Ok(7)));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<()> =
            with_timeout_error(async { Err(ProtocolError::Syntax) }, RESPONSE_TIMEOUT).await;
        assert!(matches!(result, Err(ProtocolError::Syntax)));
    }
}
