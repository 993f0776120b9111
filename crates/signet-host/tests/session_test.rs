//! Integration tests for the device session.
//!
//! These tests drive a [`Session`] against a scripted in-memory channel
//! standing in for the serial line, covering the acknowledgement and
//! signature response variants, partial-read accumulation, and the
//! failure paths.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};

use signet_host::digest::{sha256_digest, TEST_PLAINTEXT};
use signet_host::{Session, SessionError, SessionState};
use signet_protocol::{ResponseKind, CMD_SIGN, SIGNATURE_SIZE, SIGN_REQUEST_SIZE};

// ============================================================================
// Scripted Channel
// ============================================================================

/// One scripted outcome for a `read` call.
enum ReadStep {
    /// Deliver these bytes (possibly fewer than the caller asked for).
    Data(Vec<u8>),
    /// Report end-of-stream.
    Eof,
    /// Report an elapsed read deadline.
    TimedOut,
}

/// An in-memory channel that plays back scripted reads and records writes.
struct MockDevice {
    reads: VecDeque<ReadStep>,
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    /// Echo the last byte of every write back as a pending read.
    echo_last_byte: bool,
    fail_writes: bool,
}

impl MockDevice {
    fn scripted(reads: Vec<ReadStep>) -> (Self, Arc<Mutex<Vec<Vec<u8>>>>) {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let device = MockDevice {
            reads: reads.into(),
            writes: writes.clone(),
            echo_last_byte: false,
            fail_writes: false,
        };
        (device, writes)
    }

    /// A device that answers every request with the last byte it received.
    fn echo() -> Self {
        MockDevice {
            reads: VecDeque::new(),
            writes: Arc::new(Mutex::new(Vec::new())),
            echo_last_byte: true,
            fail_writes: false,
        }
    }

    fn broken_pipe() -> Self {
        MockDevice {
            reads: VecDeque::new(),
            writes: Arc::new(Mutex::new(Vec::new())),
            echo_last_byte: false,
            fail_writes: true,
        }
    }
}

impl Read for MockDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reads.pop_front() {
            Some(ReadStep::Data(mut data)) => {
                if data.len() > buf.len() {
                    // Hand back what fits; the rest stays pending.
                    let rest = data.split_off(buf.len());
                    self.reads.push_front(ReadStep::Data(rest));
                }
                buf[..data.len()].copy_from_slice(&data);
                Ok(data.len())
            }
            Some(ReadStep::Eof) => Ok(0),
            Some(ReadStep::TimedOut) | None => {
                Err(io::Error::new(io::ErrorKind::TimedOut, "read deadline"))
            }
        }
    }
}

impl Write for MockDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"));
        }
        self.writes.lock().unwrap().push(buf.to_vec());
        if self.echo_last_byte {
            if let Some(&last) = buf.last() {
                self.reads.push_back(ReadStep::Data(vec![last]));
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn session_with(device: MockDevice) -> Session {
    Session::from_channel(Box::new(device))
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[test]
fn test_ack_scenario() {
    // Device acknowledges the sign request with a single zero byte.
    let (device, writes) = MockDevice::scripted(vec![ReadStep::Data(vec![0x00])]);
    let mut session = session_with(device);

    let digest = sha256_digest(TEST_PLAINTEXT);
    session.send_sign_request(&digest).expect("send should succeed");

    let response = session
        .read_response(ResponseKind::Ack)
        .expect("read should succeed");
    assert_eq!(response, vec![0x00]);
    assert_eq!(session.state(), SessionState::ResponseReceived);

    // Exactly one request frame went out: command byte + raw digest.
    let writes = writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].len(), SIGN_REQUEST_SIZE);
    assert_eq!(writes[0][0], CMD_SIGN);
    assert_eq!(&writes[0][1..], &digest.as_bytes()[..]);
}

#[test]
fn test_signature_scenario() {
    // Device returns a full 512-byte signature buffer, delivered in
    // uneven chunks as a serial line would.
    let (device, _) = MockDevice::scripted(vec![
        ReadStep::Data(vec![0xFF; 100]),
        ReadStep::Data(vec![0xFF; 300]),
        ReadStep::Data(vec![0xFF; 112]),
    ]);
    let mut session = session_with(device);

    session
        .send_sign_request(&sha256_digest(TEST_PLAINTEXT))
        .expect("send should succeed");

    let response = session
        .read_response(ResponseKind::Signature)
        .expect("read should succeed");
    assert_eq!(response.len(), SIGNATURE_SIZE);
    assert!(response.iter().all(|&b| b == 0xFF));
}

#[test]
fn test_signature_accumulates_byte_at_a_time() {
    // Worst-case delivery: one byte per read.
    let steps = (0..SIGNATURE_SIZE)
        .map(|i| ReadStep::Data(vec![(i % 256) as u8]))
        .collect();
    let (device, _) = MockDevice::scripted(steps);
    let mut session = session_with(device);

    session
        .send_sign_request(&sha256_digest(TEST_PLAINTEXT))
        .expect("send should succeed");

    let response = session
        .read_response(ResponseKind::Signature)
        .expect("read should succeed");
    assert_eq!(response.len(), SIGNATURE_SIZE);
    let expected: Vec<u8> = (0..SIGNATURE_SIZE).map(|i| (i % 256) as u8).collect();
    assert_eq!(response, expected);
}

#[test]
fn test_echo_round_trip() {
    // A device that echoes the last byte it received answers the sign
    // request with the digest's final byte.
    let mut session = session_with(MockDevice::echo());

    let digest = sha256_digest(TEST_PLAINTEXT);
    session.send_sign_request(&digest).expect("send should succeed");

    let response = session
        .read_response(ResponseKind::Ack)
        .expect("read should succeed");
    assert_eq!(response, vec![digest.as_bytes()[31]]);
    assert_eq!(response, vec![0xD9]); // SHA-256("swap wen?") ends in 0xd9
}

// ============================================================================
// Failure Tests
// ============================================================================

#[test]
fn test_short_read_fails() {
    // Device dies after half the signature: the session must fail, not
    // hand back a truncated buffer.
    let (device, _) = MockDevice::scripted(vec![ReadStep::Data(vec![0xAB; 256]), ReadStep::Eof]);
    let mut session = session_with(device);

    session
        .send_sign_request(&sha256_digest(TEST_PLAINTEXT))
        .expect("send should succeed");

    let err = session
        .read_response(ResponseKind::Signature)
        .expect_err("read should fail");
    assert!(matches!(
        err,
        SessionError::ShortRead {
            expected: 512,
            actual: 256,
        }
    ));
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_channel_closed_before_response() {
    let (device, _) = MockDevice::scripted(vec![ReadStep::Eof]);
    let mut session = session_with(device);

    session
        .send_sign_request(&sha256_digest(TEST_PLAINTEXT))
        .expect("send should succeed");

    let err = session
        .read_response(ResponseKind::Ack)
        .expect_err("read should fail");
    assert!(matches!(err, SessionError::ChannelClosed));
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_read_timeout() {
    let (device, _) = MockDevice::scripted(vec![ReadStep::TimedOut]);
    let mut session = session_with(device);

    session
        .send_sign_request(&sha256_digest(TEST_PLAINTEXT))
        .expect("send should succeed");

    let err = session
        .read_response(ResponseKind::Ack)
        .expect_err("read should fail");
    assert!(matches!(
        err,
        SessionError::ReadTimeout {
            expected: 1,
            received: 0,
        }
    ));
}

#[test]
fn test_timeout_after_partial_response_reports_progress() {
    let (device, _) = MockDevice::scripted(vec![ReadStep::Data(vec![0x01; 10]), ReadStep::TimedOut]);
    let mut session = session_with(device);

    session
        .send_sign_request(&sha256_digest(TEST_PLAINTEXT))
        .expect("send should succeed");

    let err = session
        .read_response(ResponseKind::Signature)
        .expect_err("read should fail");
    assert!(matches!(
        err,
        SessionError::ReadTimeout {
            expected: 512,
            received: 10,
        }
    ));
}

#[test]
fn test_write_fault_closes_session() {
    let mut session = session_with(MockDevice::broken_pipe());

    let err = session
        .send_sign_request(&sha256_digest(TEST_PLAINTEXT))
        .expect_err("send should fail");
    assert!(matches!(err, SessionError::WriteError { .. }));
    assert_eq!(session.state(), SessionState::Closed);

    // The session is terminal; nothing further is allowed.
    let err = session
        .read_response(ResponseKind::Ack)
        .expect_err("read should fail");
    assert!(matches!(err, SessionError::InvalidState { .. }));
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[test]
fn test_close_is_idempotent() {
    let (device, _) = MockDevice::scripted(vec![]);
    let mut session = session_with(device);

    session.close();
    assert_eq!(session.state(), SessionState::Closed);

    // Second close is a no-op, not an error.
    session.close();
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_single_request_per_session() {
    let (device, writes) = MockDevice::scripted(vec![ReadStep::Data(vec![0x00])]);
    let mut session = session_with(device);

    let digest = sha256_digest(TEST_PLAINTEXT);
    session.send_sign_request(&digest).expect("send should succeed");

    let err = session
        .send_sign_request(&digest)
        .expect_err("second send should fail");
    assert!(matches!(
        err,
        SessionError::InvalidState {
            operation: "send_sign_request",
            state: SessionState::RequestSent,
        }
    ));

    assert_eq!(writes.lock().unwrap().len(), 1);
}

#[test]
fn test_read_before_send_fails() {
    let (device, _) = MockDevice::scripted(vec![ReadStep::Data(vec![0x00])]);
    let mut session = session_with(device);

    let err = session
        .read_response(ResponseKind::Ack)
        .expect_err("read should fail");
    assert!(matches!(
        err,
        SessionError::InvalidState {
            operation: "read_response",
            state: SessionState::Open,
        }
    ));
}

#[test]
fn test_send_after_close_fails() {
    let (device, _) = MockDevice::scripted(vec![]);
    let mut session = session_with(device);
    session.close();

    let err = session
        .send_sign_request(&sha256_digest(TEST_PLAINTEXT))
        .expect_err("send should fail");
    assert!(matches!(
        err,
        SessionError::InvalidState {
            operation: "send_sign_request",
            state: SessionState::Closed,
        }
    ));
}
