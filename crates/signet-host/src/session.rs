//! One-shot device session.
//!
//! A [`Session`] owns the byte channel for the duration of a single
//! request/response exchange. The protocol has no resend or recovery
//! states: a failure at any step releases the channel and parks the
//! session in [`SessionState::Closed`], and the caller opens a new session
//! to retry.

use std::io::ErrorKind;

use signet_protocol::{Command, Digest, ResponseAccumulator, ResponseKind, SIGN_REQUEST_SIZE};
use tracing::{debug, trace, warn};

use crate::error::SessionError;
use crate::transport::{self, Channel, ChannelOptions};

/// State of a device session.
///
/// Transitions are strictly sequential; `Closed` is reachable from every
/// state and terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Channel acquired, no request sent yet.
    Open,
    /// The sign request has been written.
    RequestSent,
    /// The full response has been read.
    ResponseReceived,
    /// Channel released. Terminal.
    Closed,
}

/// A session holding exclusive ownership of the channel to the device.
///
/// Exactly one request frame is sent and exactly one fixed-length response
/// is read per session. Dropping the session releases the channel.
pub struct Session {
    channel: Option<Box<dyn Channel>>,
    state: SessionState,
}

impl Session {
    /// Open a session on the channel described by `options`.
    pub fn open(options: &ChannelOptions) -> Result<Self, SessionError> {
        let channel = transport::open_channel(options)?;
        debug!(endpoint = %options.endpoint, "session open");
        Ok(Session {
            channel: Some(channel),
            state: SessionState::Open,
        })
    }

    /// Open a session over an already-connected byte stream.
    ///
    /// This is the seam used by tests and simulators: any `Read + Write`
    /// stream stands in for the serial line.
    pub fn from_channel(channel: Box<dyn Channel>) -> Self {
        Session {
            channel: Some(channel),
            state: SessionState::Open,
        }
    }

    /// Get the current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Send the sign request for `digest`.
    ///
    /// Writes the full request frame (command byte plus raw digest) as a
    /// single logical write. Any write fault releases the channel and is
    /// fatal to the session.
    pub fn send_sign_request(&mut self, digest: &Digest) -> Result<(), SessionError> {
        if self.state != SessionState::Open {
            return Err(SessionError::InvalidState {
                operation: "send_sign_request",
                state: self.state,
            });
        }
        let channel = self.channel.as_mut().ok_or(SessionError::ChannelClosed)?;

        let frame = Command::Sign { digest: *digest }.encode();
        debug_assert_eq!(frame.len(), SIGN_REQUEST_SIZE);

        trace!(digest = %digest.to_hex(), "sending sign request");
        let written = channel.write_all(&frame);
        let flushed = written.and_then(|_| channel.flush());
        if let Err(e) = flushed {
            warn!(error = %e, "request write failed");
            self.release();
            return Err(SessionError::WriteError { source: e });
        }

        self.state = SessionState::RequestSent;
        Ok(())
    }

    /// Block until the full response for `kind` has been read.
    ///
    /// The channel may deliver fewer bytes per underlying read than
    /// requested; partial reads are buffered until the expected length is
    /// reached. Returns exactly `kind.expected_len()` bytes or fails —
    /// never a short result. Any failure releases the channel.
    pub fn read_response(&mut self, kind: ResponseKind) -> Result<Vec<u8>, SessionError> {
        if self.state != SessionState::RequestSent {
            return Err(SessionError::InvalidState {
                operation: "read_response",
                state: self.state,
            });
        }
        // Take the channel out for the duration of the read so failure
        // paths release it by dropping.
        let mut channel = self.channel.take().ok_or(SessionError::ChannelClosed)?;

        let expected = kind.expected_len();
        let mut accumulator = ResponseAccumulator::new(expected);
        let mut chunk = [0u8; 512];

        loop {
            if let Some(response) = accumulator.take() {
                self.channel = Some(channel);
                self.state = SessionState::ResponseReceived;
                debug!(kind = %kind, len = response.len(), "response received");
                return Ok(response);
            }

            match channel.read(&mut chunk) {
                Ok(0) => {
                    let received = accumulator.buffered_len();
                    self.release();
                    return Err(if received == 0 {
                        SessionError::ChannelClosed
                    } else {
                        SessionError::ShortRead {
                            expected,
                            actual: received,
                        }
                    });
                }
                Ok(n) => accumulator.push(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => {
                    let received = accumulator.buffered_len();
                    warn!(expected, received, "read deadline elapsed");
                    self.release();
                    return Err(SessionError::ReadTimeout { expected, received });
                }
                Err(e) => {
                    // Serial devices report unplug as an I/O fault rather
                    // than a clean EOF.
                    warn!(error = %e, "read failed");
                    self.release();
                    return Err(SessionError::ChannelClosed);
                }
            }
        }
    }

    /// Close the session and release the channel.
    ///
    /// Idempotent: closing an already-closed session is a no-op.
    pub fn close(&mut self) {
        if self.state != SessionState::Closed {
            trace!("session closed");
        }
        self.release();
    }

    /// Drop the channel and park the session in the terminal state.
    fn release(&mut self) {
        self.channel = None;
        self.state = SessionState::Closed;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}
