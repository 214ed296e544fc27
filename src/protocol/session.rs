//! Session orchestration
//!
//! One session is one rover from accept to close: authenticate, establish
//! the pose, walk to the origin, pick up the secret message, log out.
//! Terminal errors map to at most one farewell reply, then the connection
//! closes either way.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::info;

use crate::core::frame::{MessageKind, ServerCommand};
use crate::error::{ProtocolError, Result};
use crate::protocol::auth;
use crate::protocol::nav::{CommandBudget, Navigator};
use crate::service::Connection;

pub struct Session<S> {
    conn: Connection<S>,
    command_limit: u32,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, command_limit: u32) -> Self {
        Self {
            conn: Connection::new(stream),
            command_limit,
        }
    }

    /// Drive the session to completion and translate terminal errors into
    /// their wire replies. The connection closes when the session drops.
    pub async fn run(mut self) -> Result<()> {
        let outcome = self.conversation().await;

        if let Err(err) = &outcome {
            match err {
                ProtocolError::Syntax => {
                    let _ = self.conn.send(ServerCommand::SyntaxError).await;
                }
                ProtocolError::Logic => {
                    let _ = self.conn.send(ServerCommand::LogicError).await;
                }
                // auth rejections already answered on the wire; everything
                // else closes without a reply
                _ => {}
            }
        }
        outcome
    }

    async fn conversation(&mut self) -> Result<()> {
        let username = auth::authenticate(&mut self.conn).await?;
        info!(username = %username, "rover authenticated");

        let budget = CommandBudget::new(self.command_limit);
        let mut nav = Navigator::prime(&mut self.conn, budget).await?;
        nav.seek_origin().await?;

        self.conn.send(ServerCommand::PickUp).await?;
        let message = self.conn.recv(MessageKind::Message).await?;
        info!(message = %message, "secret message retrieved");

        self.conn.send(ServerCommand::Logout).await?;
        Ok(())
    }
}
