#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Wire-level edge cases: read deadlines, malformed frames, and recharge
//! interrupt sequencing, driven through an in-memory duplex stream.

use std::time::Duration;

use tokio::io::AsyncWriteExt;

use rover_protocol::core::frame::{MessageKind, TERMINATOR};
use rover_protocol::error::ProtocolError;
use rover_protocol::service::Connection;

fn frame(body: &str) -> Vec<u8> {
    let mut wire = body.as_bytes().to_vec();
    wire.extend_from_slice(&TERMINATOR);
    wire
}

// ============================================================================
// READ DEADLINES
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_silent_peer_times_out() {
    let (server_io, _robot_io) = tokio::io::duplex(4096);
    let mut conn = Connection::new(server_io);

    let outcome = conn.recv(MessageKind::Username).await;
    assert!(matches!(outcome, Err(ProtocolError::Timeout)));
}

#[tokio::test(start_paused = true)]
async fn test_stall_mid_frame_times_out() {
    let (server_io, mut robot_io) = tokio::io::duplex(4096);
    let mut conn = Connection::new(server_io);

    // a valid prefix, then silence
    robot_io.write_all(b"OK 1").await.unwrap();

    let outcome = conn.recv(MessageKind::Ok).await;
    assert!(matches!(outcome, Err(ProtocolError::Timeout)));
}

#[tokio::test(start_paused = true)]
async fn test_deadline_resets_on_every_byte() {
    let (server_io, mut robot_io) = tokio::io::duplex(4096);
    let mut conn = Connection::new(server_io);

    // 800ms between bytes stays under the 1s per-byte deadline even though
    // the whole frame takes several virtual seconds to arrive
    tokio::spawn(async move {
        for byte in frame("OK 1 2") {
            tokio::time::sleep(Duration::from_millis(800)).await;
            robot_io.write_all(&[byte]).await.unwrap();
        }
    });

    let body = conn.recv(MessageKind::Ok).await.expect("trickle should pass");
    assert_eq!(body, "OK 1 2");
}

#[tokio::test(start_paused = true)]
async fn test_recharge_wait_allows_five_seconds() {
    let (server_io, mut robot_io) = tokio::io::duplex(4096);
    let mut conn = Connection::new(server_io);

    tokio::spawn(async move {
        robot_io.write_all(&frame("RECHARGING")).await.unwrap();
        // well past the normal deadline, within the recharge window
        tokio::time::sleep(Duration::from_secs(3)).await;
        robot_io.write_all(&frame("FULL POWER")).await.unwrap();
        robot_io.write_all(&frame("OK 0 0")).await.unwrap();
    });

    let body = conn.recv(MessageKind::Ok).await.expect("recharge should pass");
    assert_eq!(body, "OK 0 0");
}

#[tokio::test(start_paused = true)]
async fn test_recharge_wait_expires_after_five_seconds() {
    let (server_io, mut robot_io) = tokio::io::duplex(4096);
    let mut conn = Connection::new(server_io);

    tokio::spawn(async move {
        robot_io.write_all(&frame("RECHARGING")).await.unwrap();
        tokio::time::sleep(Duration::from_secs(6)).await;
        robot_io.write_all(&frame("FULL POWER")).await.unwrap();
        // keep the pipe open either way
        tokio::time::sleep(Duration::from_secs(60)).await;
    });

    let outcome = conn.recv(MessageKind::Ok).await;
    assert!(matches!(outcome, Err(ProtocolError::Timeout)));
}

#[tokio::test]
async fn test_closed_peer_is_not_a_timeout() {
    let (server_io, robot_io) = tokio::io::duplex(4096);
    let mut conn = Connection::new(server_io);

    drop(robot_io);

    let outcome = conn.recv(MessageKind::Username).await;
    assert!(matches!(outcome, Err(ProtocolError::ConnectionClosed)));
}

// ============================================================================
// FRAME SHAPE
// ============================================================================

#[tokio::test]
async fn test_stray_terminator_byte_inside_body() {
    let (server_io, mut robot_io) = tokio::io::duplex(4096);
    let mut conn = Connection::new(server_io);

    robot_io.write_all(b"us\x07er\x07\x08").await.unwrap();

    let outcome = conn.recv(MessageKind::Username).await;
    assert!(matches!(outcome, Err(ProtocolError::Syntax)));
}

#[tokio::test]
async fn test_oversized_message_rejected_before_terminator() {
    let (server_io, mut robot_io) = tokio::io::duplex(4096);
    let mut conn = Connection::new(server_io);

    // the secret message caps at 100 encoded bytes; the 100th body byte
    // makes the frame hopeless with no terminator in sight
    robot_io.write_all(&[b'm'; 100]).await.unwrap();

    let outcome = conn.recv(MessageKind::Message).await;
    assert!(matches!(outcome, Err(ProtocolError::Syntax)));
}

#[tokio::test]
async fn test_frame_split_across_writes() {
    let (server_io, mut robot_io) = tokio::io::duplex(4096);
    let mut conn = Connection::new(server_io);

    robot_io.write_all(b"Opp").await.unwrap();
    robot_io.flush().await.unwrap();
    robot_io.write_all(b"ortunity\x07").await.unwrap();
    robot_io.flush().await.unwrap();
    robot_io.write_all(b"\x08").await.unwrap();

    let body = conn.recv(MessageKind::Username).await.expect("should parse");
    assert_eq!(body, "Opportunity");
}

// ============================================================================
// RECHARGE SEQUENCING
// ============================================================================

#[tokio::test]
async fn test_repeated_recharge_interrupts() {
    let (server_io, mut robot_io) = tokio::io::duplex(4096);
    let mut conn = Connection::new(server_io);

    let mut script = Vec::new();
    script.extend_from_slice(&frame("RECHARGING"));
    script.extend_from_slice(&frame("FULL POWER"));
    script.extend_from_slice(&frame("RECHARGING"));
    script.extend_from_slice(&frame("FULL POWER"));
    script.extend_from_slice(&frame("OK -1 7"));
    robot_io.write_all(&script).await.unwrap();

    let body = conn.recv(MessageKind::Ok).await.expect("should pass");
    assert_eq!(body, "OK -1 7");
}

#[tokio::test]
async fn test_recharging_twice_in_a_row_is_logic_error() {
    let (server_io, mut robot_io) = tokio::io::duplex(4096);
    let mut conn = Connection::new(server_io);

    let mut script = Vec::new();
    script.extend_from_slice(&frame("RECHARGING"));
    script.extend_from_slice(&frame("RECHARGING"));
    robot_io.write_all(&script).await.unwrap();

    let outcome = conn.recv(MessageKind::Ok).await;
    assert!(matches!(outcome, Err(ProtocolError::Logic)));
}

#[tokio::test]
async fn test_ordinary_reply_during_recharge_is_logic_error() {
    let (server_io, mut robot_io) = tokio::io::duplex(4096);
    let mut conn = Connection::new(server_io);

    let mut script = Vec::new();
    script.extend_from_slice(&frame("RECHARGING"));
    script.extend_from_slice(&frame("OK 3 3"));
    robot_io.write_all(&script).await.unwrap();

    let outcome = conn.recv(MessageKind::Ok).await;
    assert!(matches!(outcome, Err(ProtocolError::Logic)));
}
