//! # Core Protocol Components
//!
//! Low-level frame handling: the wire vocabulary and the incremental codec.
//!
//! This module provides the foundation for the protocol, handling frame
//! delimiting, per-byte validation, and the fixed server command set.
//!
//! ## Components
//! - **Frame**: Message kinds, server commands, and the frame terminator
//! - **Codec**: Tokio codec validating frames byte by byte
//!
//! ## Wire Format
//! ```text
//! [Body(0..=98)] [0x07 0x08]
//! ```
//!
//! ## Robustness
//! - Per-kind maximum frame length (rejects oversized frames mid-stream)
//! - Terminator bytes are forbidden inside bodies
//! - Hopeless frames fail at the first impossible byte, not at the terminator

pub mod codec;
pub mod frame;
