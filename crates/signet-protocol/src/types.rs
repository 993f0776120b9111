//! Common types used in the protocol.

use crate::constants::*;

/// A 32-byte SHA-256 digest, the payload of a sign request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest(pub [u8; DIGEST_SIZE]);

impl Digest {
    /// Create a new digest from bytes.
    pub fn new(bytes: [u8; DIGEST_SIZE]) -> Self {
        Digest(bytes)
    }

    /// Create from a slice. Returns None if slice is wrong length.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == DIGEST_SIZE {
            let mut bytes = [0u8; DIGEST_SIZE];
            bytes.copy_from_slice(slice);
            Some(Digest(bytes))
        } else {
            None
        }
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Get the bytes as a hex string.
    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }
}

impl Default for Digest {
    fn default() -> Self {
        Digest([0u8; DIGEST_SIZE])
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
