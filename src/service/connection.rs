//! # Framed Rover Connection
//!
//! One rover's byte stream wrapped with the frame codec, read deadlines,
//! and recharge handling.
//!
//! ## Read Discipline
//! Bytes are pulled one at a time and validated through [`FrameCodec`]
//! after every byte. A fresh deadline applies to each byte: 1 second
//! normally, 5 seconds while a recharge announcement is pending. A peer
//! that keeps trickling valid bytes stays alive; one that stalls or turns
//! hopeless does not.
//!
//! ## Recharge Handling
//! A `RECHARGING` frame may replace any expected reply. The connection
//! then waits for `FULL POWER` under the long deadline and re-enters the
//! original expectation from scratch. Interrupts may repeat; each one is
//! handled independently.

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, instrument};

use crate::core::codec::{Frame, FrameCodec};
use crate::core::frame::{MessageKind, ServerCommand};
use crate::error::{ProtocolError, Result};
use crate::utils::timeout::{with_timeout_error, RECHARGE_TIMEOUT, RESPONSE_TIMEOUT};

pub struct Connection<S> {
    stream: S,
    codec: FrameCodec,
    buf: BytesMut,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            codec: FrameCodec::new(),
            buf: BytesMut::with_capacity(128),
        }
    }

    /// Send one server command, terminator appended.
    #[instrument(skip(self), level = "debug")]
    pub async fn send(&mut self, cmd: ServerCommand) -> Result<()> {
        let mut out = BytesMut::new();
        self.codec.encode(cmd, &mut out)?;
        self.stream.write_all(&out).await?;
        self.stream.flush().await?;
        debug!(opcode = cmd.opcode(), "sent command");
        Ok(())
    }

    /// Receive the next frame of the expected kind, transparently serving
    /// any number of recharge interrupts in between.
    #[instrument(skip(self), level = "debug")]
    pub async fn recv(&mut self, kind: MessageKind) -> Result<String> {
        loop {
            match self.read_frame(kind).await? {
                Frame::Body(body) => {
                    debug!(body = ?body, "received frame");
                    return Ok(body);
                }
                Frame::Recharging => {
                    debug!("rover recharging");
                    self.await_full_power().await?;
                    debug!("rover back to full power");
                }
            }
        }
    }

    async fn await_full_power(&mut self) -> Result<()> {
        match self.read_frame(MessageKind::FullPower).await? {
            Frame::Body(_) => Ok(()),
            Frame::Recharging => Err(ProtocolError::Logic),
        }
    }

    /// Accumulate one frame byte by byte under the kind's deadline.
    async fn read_frame(&mut self, kind: MessageKind) -> Result<Frame> {
        self.codec.expect(kind);
        let window = if kind == MessageKind::FullPower {
            RECHARGE_TIMEOUT
        } else {
            RESPONSE_TIMEOUT
        };

        loop {
            if let Some(frame) = self.codec.decode(&mut self.buf)? {
                return Ok(frame);
            }
            let byte = self.read_byte(window).await?;
            self.buf.extend_from_slice(&[byte]);
        }
    }

    async fn read_byte(&mut self, window: std::time::Duration) -> Result<u8> {
        let mut byte = [0u8; 1];
        let n = with_timeout_error(
            async {
                let n = self.stream.read(&mut byte).await?;
                Ok(n)
            },
            window,
        )
        .await?;
        if n == 0 {
            return Err(ProtocolError::ConnectionClosed);
        }
        Ok(byte[0])
    }
}
