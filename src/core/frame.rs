//! # Wire Vocabulary
//!
//! Message kinds, server commands, and the frame terminator.
//!
//! Every frame on the wire is a run of text bytes closed by the two-byte
//! terminator `0x07 0x08`. Neither terminator byte may appear inside a
//! body. Each client message kind carries its own shape and maximum encoded
//! length (terminator included), so the reader dispatches on a single
//! lookup instead of scattering per-kind conditionals.

use std::fmt;

/// Two-byte frame terminator, `"\x07\x08"`
pub const TERMINATOR: [u8; 2] = [0x07, 0x08];

/// Body of the recharge announcement
pub const RECHARGING_BODY: &[u8] = b"RECHARGING";

/// Body of the recharge completion
pub const FULL_POWER_BODY: &[u8] = b"FULL POWER";

/// Complete recharge announcement frame, terminator included
pub const RECHARGING_FRAME: &[u8] = b"RECHARGING\x07\x08";

/// Client message kinds.
///
/// A kind is the reader's expectation: it decides which shapes are
/// acceptable and how long the encoded frame may grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Rover name, 1-18 free bytes
    Username,
    /// Key table index, 1-3 digits
    KeyId,
    /// Client-side confirmation key, 1-5 digits
    Confirmation,
    /// Movement reply, `OK <x> <y>`
    Ok,
    /// Literal `RECHARGING`
    Recharging,
    /// Literal `FULL POWER`
    FullPower,
    /// Secret message, 0-98 free bytes
    Message,
}

impl MessageKind {
    /// Maximum encoded frame length in bytes, terminator included
    pub fn max_frame_len(self) -> usize {
        match self {
            Self::Username => 20,
            Self::KeyId => 5,
            Self::Confirmation => 7,
            Self::Ok => 12,
            Self::Recharging => 12,
            Self::FullPower => 12,
            Self::Message => 100,
        }
    }

    /// Whether a partially accumulated frame can still grow into a valid
    /// one of this kind.
    ///
    /// `partial` holds every byte read so far, never a complete terminator.
    /// A single trailing `0x07` is treated as the terminator's first half,
    /// not as body content.
    pub fn accepts_prefix(self, partial: &[u8]) -> bool {
        let body = match partial {
            [head @ .., last] if *last == TERMINATOR[0] => head,
            _ => partial,
        };

        match self {
            Self::Username => body.len() <= 18 && body_is_clean(body),
            Self::KeyId => digits_prefix(body, 3),
            Self::Confirmation => digits_prefix(body, 5),
            Self::Ok => ok_prefix(body),
            Self::Recharging => RECHARGING_FRAME.starts_with(partial),
            // no shape constraint until the frame completes or overflows
            Self::FullPower => true,
            Self::Message => body.len() <= 98 && body_is_clean(body),
        }
    }

    /// Validate a completed frame body (terminator already stripped).
    pub fn matches(self, body: &[u8]) -> bool {
        match self {
            Self::Username => (1..=18).contains(&body.len()) && body_is_clean(body),
            Self::KeyId => is_digits(body, 1, 3),
            Self::Confirmation => is_digits(body, 1, 5),
            Self::Ok => std::str::from_utf8(body)
                .ok()
                .and_then(parse_ok_body)
                .is_some(),
            Self::Recharging => body == RECHARGING_BODY,
            Self::FullPower => body == FULL_POWER_BODY,
            Self::Message => body.len() <= 98 && body_is_clean(body),
        }
    }
}

/// Parse the body of an `OK <x> <y>` reply into coordinates.
///
/// The shape is strict: exactly three space-separated tokens, the first the
/// literal `OK`, the rest optionally signed integers of at most 7 digits.
pub fn parse_ok_body(body: &str) -> Option<(i64, i64)> {
    let mut tokens = body.split(' ');
    if tokens.next()? != "OK" {
        return None;
    }
    let x = parse_coord(tokens.next()?)?;
    let y = parse_coord(tokens.next()?)?;
    if tokens.next().is_some() {
        return None;
    }
    Some((x, y))
}

fn parse_coord(token: &str) -> Option<i64> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || digits.len() > 7 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn body_is_clean(body: &[u8]) -> bool {
    !body.iter().any(|b| TERMINATOR.contains(b))
}

fn is_digits(body: &[u8], min: usize, max: usize) -> bool {
    (min..=max).contains(&body.len()) && body.iter().all(u8::is_ascii_digit)
}

fn digits_prefix(body: &[u8], max: usize) -> bool {
    body.len() <= max && body.iter().all(u8::is_ascii_digit)
}

fn ok_prefix(body: &[u8]) -> bool {
    if !body_is_clean(body) {
        return false;
    }
    let tokens: Vec<&[u8]> = body.split(|b| *b == b' ').collect();
    if tokens.len() > 3 {
        return false;
    }
    if !b"OK".starts_with(tokens[0]) {
        return false;
    }
    tokens[1..].iter().all(|t| coord_prefix(t))
}

fn coord_prefix(token: &[u8]) -> bool {
    let digits = token.strip_prefix(b"-").unwrap_or(token);
    digits.len() <= 7 && digits.iter().all(u8::is_ascii_digit)
}

/// Server commands, opcodes 1-12, each mapping to one fixed wire literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerCommand {
    /// Server-side confirmation key, sent as bare decimal text
    KeyConfirmation(u16),
    Move,
    TurnLeft,
    TurnRight,
    PickUp,
    Logout,
    KeyRequest,
    Ok,
    LoginFailed,
    SyntaxError,
    LogicError,
    KeyOutOfRange,
}

impl ServerCommand {
    /// Protocol opcode, 1-12
    pub fn opcode(self) -> u8 {
        match self {
            Self::KeyConfirmation(_) => 1,
            Self::Move => 2,
            Self::TurnLeft => 3,
            Self::TurnRight => 4,
            Self::PickUp => 5,
            Self::Logout => 6,
            Self::KeyRequest => 7,
            Self::Ok => 8,
            Self::LoginFailed => 9,
            Self::SyntaxError => 10,
            Self::LogicError => 11,
            Self::KeyOutOfRange => 12,
        }
    }
}

impl fmt::Display for ServerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyConfirmation(key) => write!(f, "{key}"),
            Self::Move => f.write_str("102 MOVE"),
            Self::TurnLeft => f.write_str("103 TURN LEFT"),
            Self::TurnRight => f.write_str("104 TURN RIGHT"),
            Self::PickUp => f.write_str("105 GET MESSAGE"),
            Self::Logout => f.write_str("106 LOGOUT"),
            Self::KeyRequest => f.write_str("107 KEY REQUEST"),
            Self::Ok => f.write_str("200 OK"),
            Self::LoginFailed => f.write_str("300 LOGIN FAILED"),
            Self::SyntaxError => f.write_str("301 SYNTAX ERROR"),
            Self::LogicError => f.write_str("302 LOGIC ERROR"),
            Self::KeyOutOfRange => f.write_str("303 KEY OUT OF RANGE"),
        }
    }
}
