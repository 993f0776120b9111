//! Responses from the signing device.

use crate::constants::*;
use crate::error::ProtocolError;

/// The kind of response the host expects for the exchange it is running.
///
/// The wire carries no length field: how many bytes the device sends back
/// is a property of the command and of which firmware variant is attached.
/// The sign command is answered either by a one-byte acknowledgement or by
/// a full signature buffer, and the host must choose which one it is
/// talking to — this is caller configuration, never inferred from the
/// response itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// A one-byte acknowledgement / status code.
    Ack,
    /// A 512-byte signature buffer.
    Signature,
}

impl ResponseKind {
    /// Number of bytes the device sends for this kind of response.
    pub fn expected_len(&self) -> usize {
        match self {
            ResponseKind::Ack => ACK_SIZE,
            ResponseKind::Signature => SIGNATURE_SIZE,
        }
    }
}

impl std::fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseKind::Ack => write!(f, "ack"),
            ResponseKind::Signature => write!(f, "signature"),
        }
    }
}

/// Interpretation of the one-byte acknowledgement.
///
/// The firmware writes a single indicator byte on its fault paths; any
/// other value is device-defined and passed through as [`DeviceStatus::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    /// Signing failed on the device.
    SignError,
    /// The firmware panicked.
    Panic,
    /// The firmware took an unexpected trap.
    Trap,
    /// The firmware ran out of heap.
    HeapExhausted,
    /// Any other status byte.
    Other(u8),
}

impl From<u8> for DeviceStatus {
    fn from(byte: u8) -> Self {
        match byte {
            STATUS_SIGN_ERROR => DeviceStatus::SignError,
            STATUS_PANIC => DeviceStatus::Panic,
            STATUS_TRAP => DeviceStatus::Trap,
            STATUS_HEAP_EXHAUSTED => DeviceStatus::HeapExhausted,
            other => DeviceStatus::Other(other),
        }
    }
}

impl From<DeviceStatus> for u8 {
    fn from(status: DeviceStatus) -> Self {
        match status {
            DeviceStatus::SignError => STATUS_SIGN_ERROR,
            DeviceStatus::Panic => STATUS_PANIC,
            DeviceStatus::Trap => STATUS_TRAP,
            DeviceStatus::HeapExhausted => STATUS_HEAP_EXHAUSTED,
            DeviceStatus::Other(byte) => byte,
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceStatus::SignError => write!(f, "sign error"),
            DeviceStatus::Panic => write!(f, "firmware panic"),
            DeviceStatus::Trap => write!(f, "firmware trap"),
            DeviceStatus::HeapExhausted => write!(f, "heap exhausted"),
            DeviceStatus::Other(byte) => write!(f, "status 0x{:02X}", byte),
        }
    }
}

/// A decoded response from the device.
///
/// Decoding is optional: the session layer hands back raw bytes, and this
/// is a typed view over them for callers that want one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// One-byte acknowledgement.
    Ack(DeviceStatus),
    /// Signature buffer.
    Signature(Vec<u8>),
}

impl Response {
    /// Decode raw response bytes for a known response kind.
    ///
    /// Fails if the byte count does not match the kind — a response is
    /// never silently truncated or padded.
    pub fn decode(kind: ResponseKind, bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.len() != kind.expected_len() {
            return Err(ProtocolError::ResponseLengthMismatch {
                expected: kind.expected_len(),
                actual: bytes.len(),
            });
        }

        match kind {
            ResponseKind::Ack => Ok(Response::Ack(DeviceStatus::from(bytes[0]))),
            ResponseKind::Signature => Ok(Response::Signature(bytes.to_vec())),
        }
    }
}
