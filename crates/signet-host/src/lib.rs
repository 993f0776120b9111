//! Host-side session layer for the signet signing device.
//!
//! This crate drives one request/response exchange against a signing
//! device reachable over a serial-like byte channel:
//!
//! 1. [`digest`] produces the SHA-256 digest the device is asked to sign.
//! 2. [`Session`] owns the channel for the lifetime of the exchange: it
//!    sends the framed sign request, blocks until the expected number of
//!    response bytes has arrived, and hands the raw bytes back.
//! 3. [`transport`] provides the concrete channels: an OS serial port or a
//!    TCP bridge that exposes a UART on a socket.
//!
//! The session is written against the [`Channel`] trait, so tests (and
//! simulators) can substitute any in-memory byte stream for real hardware.
//!
//! ```rust,ignore
//! use signet_host::{run_exchange, ChannelOptions};
//! use signet_protocol::ResponseKind;
//!
//! let options = ChannelOptions::serial("/dev/ttyUSB0");
//! let response = run_exchange(&options, ResponseKind::Ack)?;
//! ```

pub mod digest;
mod error;
mod exchange;
mod session;
pub mod transport;

pub use error::SessionError;
pub use exchange::run_exchange;
pub use session::{Session, SessionState};
pub use transport::{Channel, ChannelOptions, Endpoint};
