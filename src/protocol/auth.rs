//! Keyed-hash challenge-response authentication
//!
//! Both sides share a table of five key pairs, addressed by an index the
//! rover announces. The server proves itself first: it derives a
//! confirmation number from the rover's name hash and the server-side key,
//! and the rover answers with the client-side derivation of the same hash.
//! Only then is the session considered authenticated.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, instrument};

use crate::core::frame::{MessageKind, ServerCommand};
use crate::error::{ProtocolError, Result};
use crate::service::Connection;

/// One entry of the shared authentication key table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPair {
    pub server: u16,
    pub client: u16,
}

/// Shared key table, addressed by the rover's KEY_ID (0-4).
pub const KEY_TABLE: [KeyPair; 5] = [
    KeyPair { server: 23019, client: 32037 },
    KeyPair { server: 32037, client: 29295 },
    KeyPair { server: 18789, client: 13603 },
    KeyPair { server: 16443, client: 29533 },
    KeyPair { server: 18189, client: 21952 },
];

/// Name hash: sum of character code points, times 1000, modulo 65536.
pub fn username_hash(username: &str) -> u16 {
    let sum: u64 = username.chars().map(|c| c as u64).sum();
    ((sum * 1000) % 65536) as u16
}

/// Derive the (server, client) confirmation numbers for one key pair.
pub fn derive_keys(hash: u16, pair: KeyPair) -> (u16, u16) {
    let server = (u32::from(hash) + u32::from(pair.server)) % 65536;
    let client = (u32::from(hash) + u32::from(pair.client)) % 65536;
    (server as u16, client as u16)
}

/// Run the authentication phase on a fresh connection.
///
/// Returns the rover's name once the exchange succeeds. On an out-of-range
/// key index or a confirmation mismatch the corresponding error reply is
/// sent before the error is returned, so the caller only has to close.
///
/// # Errors
/// [`ProtocolError::KeyOutOfRange`] and [`ProtocolError::LoginFailed`] for
/// the two rejection paths, plus any wire-level error.
#[instrument(skip(conn), level = "debug")]
pub async fn authenticate<S>(conn: &mut Connection<S>) -> Result<String>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let username = conn.recv(MessageKind::Username).await?;
    let hash = username_hash(&username);

    conn.send(ServerCommand::KeyRequest).await?;
    let key_id = conn.recv(MessageKind::KeyId).await?;
    let id: usize = key_id.parse().map_err(|_| ProtocolError::Syntax)?;

    let Some(pair) = KEY_TABLE.get(id) else {
        conn.send(ServerCommand::KeyOutOfRange).await?;
        return Err(ProtocolError::KeyOutOfRange);
    };

    let (server_key, client_key) = derive_keys(hash, *pair);
    conn.send(ServerCommand::KeyConfirmation(server_key)).await?;

    let confirmation = conn.recv(MessageKind::Confirmation).await?;
    let submitted: u32 = confirmation.parse().map_err(|_| ProtocolError::Syntax)?;

    if submitted != u32::from(client_key) {
        conn.send(ServerCommand::LoginFailed).await?;
        return Err(ProtocolError::LoginFailed);
    }

    conn.send(ServerCommand::Ok).await?;
    debug!(username = %username, key_id = id, "rover authenticated");
    Ok(username)
}
