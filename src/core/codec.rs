//! # Frame Codec
//!
//! Incremental decoder and encoder for terminator-framed text frames,
//! built on `tokio_util`'s [`Decoder`]/[`Encoder`] traits.
//!
//! ## Decoding
//! The decoder validates after every appended byte, not only at frame
//! boundaries. A partial buffer survives as long as at least one of two
//! hypotheses holds:
//! - it is a prefix of the complete `RECHARGING` frame, or
//! - it is consistent with the expected kind's shape and still below that
//!   kind's maximum encoded length.
//!
//! While the recharge hypothesis is alive the expected kind's length cap is
//! not applied; the moment the buffer stops being a `RECHARGING` prefix,
//! both the shape and the length of the expected kind are enforced. This
//! rejects hopeless traffic mid-frame instead of waiting for a terminator
//! that may never come.
//!
//! ## Encoding
//! Server commands render as their fixed wire literal plus the terminator.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::core::frame::{
    MessageKind, ServerCommand, FULL_POWER_BODY, RECHARGING_BODY, RECHARGING_FRAME, TERMINATOR,
};
use crate::error::ProtocolError;

/// A completed inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Validated body of the expected kind, terminator stripped
    Body(String),
    /// The `RECHARGING` interrupt
    Recharging,
}

/// Stateful frame codec. The expected [`MessageKind`] drives both the
/// incremental checks and the completed-frame validation.
#[derive(Debug)]
pub struct FrameCodec {
    expected: MessageKind,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self {
            expected: MessageKind::Username,
        }
    }

    /// Set the kind the next frame must match.
    pub fn expect(&mut self, kind: MessageKind) {
        self.expected = kind;
    }

    pub fn expected(&self) -> MessageKind {
        self.expected
    }

    fn complete(&self, body: &[u8]) -> Result<Frame, ProtocolError> {
        if body == RECHARGING_BODY {
            if self.expected == MessageKind::FullPower {
                return Err(ProtocolError::Logic);
            }
            return Ok(Frame::Recharging);
        }

        if self.expected.matches(body) {
            return Ok(Frame::Body(String::from_utf8_lossy(body).into_owned()));
        }

        // A completed frame that misses its shape is a phase violation when
        // a power frame is involved, a syntax violation otherwise.
        if self.expected == MessageKind::FullPower || body == FULL_POWER_BODY {
            return Err(ProtocolError::Logic);
        }
        Err(ProtocolError::Syntax)
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn find_terminator(src: &[u8]) -> Option<usize> {
    src.windows(TERMINATOR.len()).position(|w| w == TERMINATOR)
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, ProtocolError> {
        if let Some(end) = find_terminator(src) {
            let frame = src.split_to(end + TERMINATOR.len());
            return self.complete(&frame[..end]).map(Some);
        }

        // recharge hypothesis suspends the expected kind's checks
        if RECHARGING_FRAME.starts_with(src) {
            return Ok(None);
        }
        if src.len() >= self.expected.max_frame_len() {
            return Err(ProtocolError::Syntax);
        }
        if !self.expected.accepts_prefix(src) {
            return Err(ProtocolError::Syntax);
        }
        Ok(None)
    }
}

impl Encoder<ServerCommand> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, cmd: ServerCommand, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let text = cmd.to_string();
        dst.reserve(text.len() + TERMINATOR.len());
        dst.extend_from_slice(text.as_bytes());
        dst.extend_from_slice(&TERMINATOR);
        Ok(())
    }
}
