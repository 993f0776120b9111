//! Session error types.

use thiserror::Error;

use crate::session::SessionState;

/// Errors that can occur while running an exchange against the device.
///
/// Every failure is fatal to the session: the channel is released before
/// the error propagates, and the caller must open a new session to retry.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The underlying device could not be opened.
    #[error("channel unavailable: {endpoint}: {reason}")]
    ChannelUnavailable {
        /// The endpoint that failed to open.
        endpoint: String,
        /// OS-level failure description.
        reason: String,
    },

    /// The requested line settings were rejected.
    #[error("cannot configure channel {endpoint}: {reason}")]
    ConfigurationError {
        /// The endpoint being configured.
        endpoint: String,
        /// OS-level failure description.
        reason: String,
    },

    /// The request could not be fully transmitted.
    #[error("write failed: {source}")]
    WriteError {
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// No (or not enough) data arrived within the read deadline.
    #[error("read timed out after {received} of {expected} byte(s)")]
    ReadTimeout {
        /// Expected response length.
        expected: usize,
        /// Bytes received before the deadline.
        received: usize,
    },

    /// The channel closed before the expected response length was reached.
    #[error("short read: channel closed after {actual} of {expected} byte(s)")]
    ShortRead {
        /// Expected response length.
        expected: usize,
        /// Bytes received before the channel closed.
        actual: usize,
    },

    /// The channel closed before any response data arrived.
    #[error("channel closed before a response arrived")]
    ChannelClosed,

    /// Operation attempted in the wrong session state.
    #[error("{operation} not allowed in session state {state:?}")]
    InvalidState {
        /// The operation that was attempted.
        operation: &'static str,
        /// The session state at the time.
        state: SessionState,
    },
}
