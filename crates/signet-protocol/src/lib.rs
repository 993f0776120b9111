//! Signet Device Wire Protocol
//!
//! This crate provides types and utilities for talking to a signet signing
//! device over a serial byte channel. The protocol is a minimal
//! command/response exchange where each request starts with a `CMD_*` byte.
//!
//! # Protocol Overview
//!
//! The device exposes a raw serial interface. A request is a single frame:
//!
//! ```text
//! +---------+--------------------------+
//! | CMD_*   | payload                  |
//! +---------+--------------------------+
//! ```
//!
//! For the sign request the payload is a 32-byte SHA-256 digest, giving a
//! 33-byte frame. There is no length prefix and no checksum on the wire in
//! either direction: the device replies with a fixed number of bytes, and
//! the host must already know how many bytes to expect for the command it
//! sent (see [`ResponseKind`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use signet_protocol::{Command, Digest, Response, ResponseKind};
//!
//! // Build a sign request
//! let cmd = Command::Sign { digest };
//! let frame = cmd.encode();
//!
//! // Interpret a response of a known kind
//! let response = Response::decode(ResponseKind::Ack, &received)?;
//! ```

mod commands;
mod constants;
mod error;
mod frame;
mod responses;
mod types;

pub use commands::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use responses::*;
pub use types::*;
