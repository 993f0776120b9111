//! Commands that can be sent to the signing device.

use crate::constants::*;
use crate::error::ProtocolError;
use crate::types::Digest;

/// Commands that can be sent to the signing device.
///
/// Only [`Command::Sign`] has device-side behavior today; the owner and
/// address codes exist in the firmware's message table but are reserved
/// (see [`CMD_GET_OWNER`] and [`CMD_GET_ADDRESS`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask the device to sign a digest.
    Sign {
        /// The digest to sign.
        digest: Digest,
    },
}

impl Command {
    /// Get the command code byte for this command.
    pub fn code(&self) -> u8 {
        match self {
            Command::Sign { .. } => CMD_SIGN,
        }
    }

    /// Encode this command into a request frame.
    ///
    /// The frame is the command code byte followed by the raw payload —
    /// no length prefix, no checksum. For [`Command::Sign`] this is always
    /// [`SIGN_REQUEST_SIZE`] bytes.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Command::Sign { digest } => {
                let mut frame = Vec::with_capacity(SIGN_REQUEST_SIZE);
                frame.push(CMD_SIGN);
                frame.extend_from_slice(digest.as_bytes());
                frame
            }
        }
    }

    /// Decode a request frame back into a command.
    ///
    /// Used by simulated devices in tests; a real host only encodes.
    pub fn decode(frame: &[u8]) -> Result<Self, ProtocolError> {
        let (&code, payload) = frame.split_first().ok_or(ProtocolError::FrameTooShort {
            expected: 1,
            actual: 0,
        })?;

        match code {
            CMD_SIGN => {
                let digest = Digest::from_slice(payload).ok_or(
                    ProtocolError::InvalidDigestLength {
                        expected: DIGEST_SIZE,
                        actual: payload.len(),
                    },
                )?;
                Ok(Command::Sign { digest })
            }
            other => Err(ProtocolError::UnknownCommand(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_frame_shape() {
        let digest = Digest::new([0x5Au8; DIGEST_SIZE]);
        let frame = Command::Sign { digest }.encode();

        assert_eq!(frame.len(), SIGN_REQUEST_SIZE);
        assert_eq!(frame[0], CMD_SIGN);
        assert_eq!(&frame[1..], &digest.as_bytes()[..]);
    }

    #[test]
    fn test_sign_frame_shape_is_digest_independent() {
        // The frame layout must not depend on digest content.
        for fill in [0x00u8, 0x01, 0x7F, 0xFF] {
            let frame = Command::Sign {
                digest: Digest::new([fill; DIGEST_SIZE]),
            }
            .encode();
            assert_eq!(frame.len(), SIGN_REQUEST_SIZE);
            assert_eq!(frame[0], CMD_SIGN);
        }
    }

    #[test]
    fn test_decode_round_trip() {
        let digest = Digest::new([0xC3u8; DIGEST_SIZE]);
        let cmd = Command::Sign { digest };
        let decoded = Command::decode(&cmd.encode()).expect("should decode");
        assert_eq!(decoded, cmd);
    }

    #[test]
    fn test_decode_rejects_unknown_code() {
        let mut frame = vec![0xEE];
        frame.extend_from_slice(&[0u8; DIGEST_SIZE]);
        assert_eq!(
            Command::decode(&frame),
            Err(ProtocolError::UnknownCommand(0xEE))
        );
    }

    #[test]
    fn test_decode_rejects_short_payload() {
        let frame = vec![CMD_SIGN; 16];
        assert_eq!(
            Command::decode(&frame),
            Err(ProtocolError::InvalidDigestLength {
                expected: DIGEST_SIZE,
                actual: 15,
            })
        );
    }
}
