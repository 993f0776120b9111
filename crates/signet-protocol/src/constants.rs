//! Protocol constants
//!
//! These constants define the command codes, wire sizes, and device status
//! bytes used in the signet serial protocol.

// ============================================================================
// Command Codes (host → device)
// ============================================================================

/// Sign a 32-byte digest. Payload: the raw digest bytes.
pub const CMD_SIGN: u8 = 1;
/// Return the owner key. Reserved: the firmware defines the code but does
/// not answer it yet.
pub const CMD_GET_OWNER: u8 = 2;
/// Return the wallet address. Reserved: the firmware defines the code but
/// does not answer it yet.
pub const CMD_GET_ADDRESS: u8 = 3;

// ============================================================================
// Wire Sizes
// ============================================================================

/// Size of a SHA-256 digest.
pub const DIGEST_SIZE: usize = 32;
/// Total size of a sign request frame: command byte + digest.
pub const SIGN_REQUEST_SIZE: usize = 1 + DIGEST_SIZE;
/// Size of a one-byte acknowledgement response.
pub const ACK_SIZE: usize = 1;
/// Size of a signature response (RSA-4096, PSS).
pub const SIGNATURE_SIZE: usize = 512;

// ============================================================================
// Device Status Bytes (device → host)
// ============================================================================
//
// The firmware writes a single indicator byte on its fault paths instead of
// a signature. Anything outside this table is device-defined.

/// Signing failed.
pub const STATUS_SIGN_ERROR: u8 = b'E';
/// Firmware panicked.
pub const STATUS_PANIC: u8 = b'P';
/// Firmware took an unexpected trap.
pub const STATUS_TRAP: u8 = b'T';
/// Firmware heap exhausted.
pub const STATUS_HEAP_EXHAUSTED: u8 = b'S';
