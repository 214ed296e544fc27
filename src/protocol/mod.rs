//! # Protocol Layer
//!
//! The rover conversation: authentication, navigation, and the session
//! orchestration that strings them together.
//!
//! ## Components
//! - **auth**: keyed-hash challenge-response login
//! - **nav**: pose tracking and origin seeking
//! - **session**: one rover from accept to close

pub mod auth;
pub mod nav;
pub mod session;

pub use session::Session;
