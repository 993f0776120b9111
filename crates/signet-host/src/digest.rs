//! Digest production for the signing exchange.
//!
//! The exerciser always signs the same known plaintext, so the digest is a
//! build-time constant in all but representation. Hashing a fixed
//! in-memory buffer cannot fail.

use sha2::{Digest as _, Sha256};
use signet_protocol::{Digest, DIGEST_SIZE};

/// The fixed plaintext whose digest is sent to the device.
pub const TEST_PLAINTEXT: &[u8] = b"swap wen?";

/// Compute the SHA-256 digest of `data`.
pub fn sha256_digest(data: &[u8]) -> Digest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; DIGEST_SIZE];
    bytes.copy_from_slice(&hash);
    Digest::new(bytes)
}
