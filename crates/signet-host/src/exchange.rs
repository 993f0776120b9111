//! The one-shot exchange: open, digest, send, read, close.

use signet_protocol::ResponseKind;
use tracing::info;

use crate::digest::{sha256_digest, TEST_PLAINTEXT};
use crate::error::SessionError;
use crate::session::Session;
use crate::transport::ChannelOptions;

/// Run one complete exchange against the device.
///
/// Computes the digest of the fixed test plaintext, sends the sign
/// request, and reads back a response of the given kind. The channel is
/// released on every exit path.
pub fn run_exchange(
    options: &ChannelOptions,
    kind: ResponseKind,
) -> Result<Vec<u8>, SessionError> {
    let digest = sha256_digest(TEST_PLAINTEXT);
    info!(endpoint = %options.endpoint, digest = %digest.to_hex(), expecting = %kind, "starting exchange");

    let mut session = Session::open(options)?;
    session.send_sign_request(&digest)?;
    let response = session.read_response(kind)?;
    session.close();

    info!(len = response.len(), "exchange complete");
    Ok(response)
}
