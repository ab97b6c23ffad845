//! Key exchange.

use super::GUID;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha1::{Digest, Sha1};

/// A derived `sec-websocket-accept` value: base64 of a 20-byte SHA-1
/// digest, always 28 bytes of ASCII.
pub type AcceptKey = [u8; 28];

/// Derive `sec-websocket-accept` from `sec-websocket-key`.
///
/// The token is the base64-encoded SHA-1 of the client key bytes
/// followed by the fixed [`GUID`], bit-exact per RFC-6455.
#[inline]
pub fn derive_accept_key(sec_key: &[u8]) -> AcceptKey {
    let mut sha1 = Sha1::default();
    sha1.update(sec_key);
    sha1.update(GUID);
    let digest = sha1.finalize();
    let mut output = [0_u8; 28];
    // a 20-byte digest always encodes to exactly 28 bytes
    Engine::encode_slice(&STANDARD, digest, &mut output).unwrap();
    output
}
