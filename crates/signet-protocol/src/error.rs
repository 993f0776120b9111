//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when working with protocol values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame is too short to be valid.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Unknown command code.
    #[error("unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Digest payload has the wrong length.
    #[error("invalid digest length: expected {expected} bytes, got {actual}")]
    InvalidDigestLength {
        /// Expected digest length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Response byte count does not match the expected kind.
    #[error("response length mismatch: expected {expected} bytes, got {actual}")]
    ResponseLengthMismatch {
        /// Expected response length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },
}
