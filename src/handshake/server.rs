//! Upgrade negotiation.
//!
//! The negotiator is fed complete header lines as they become
//! available from the transport and never holds partial-line state of
//! its own. Every line other than `Sec-WebSocket-Key` and the blank
//! terminator is ignored; no full http conformance is attempted.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::warn;

use super::{derive_accept_key, AcceptKey};
use super::{HTTP_LINE_BREAK, SEC_WEBSOCKET_KEY, SWITCHING_PROTOCOLS};
use crate::error::{Error, HandshakeError};
use crate::transport::Transport;

/// Outcome of one negotiation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Waiting for more header lines.
    Pending,
    /// The 101 response has been written and flushed.
    Complete,
}

/// Server-side handshake negotiator.
///
/// Holds the accept token derived from the client key, nothing else;
/// a session cannot open without one.
#[derive(Debug)]
pub struct Negotiator {
    accept: Option<AcceptKey>,
}

impl Negotiator {
    #[inline]
    pub const fn new() -> Self { Self { accept: None } }

    /// Consume as many complete header lines as the transport has
    /// buffered. Returns [`Progress::Pending`] once no full line is
    /// left, or [`Progress::Complete`] after the terminating blank
    /// line, leaving any pipelined frame bytes untouched.
    pub fn progress<IO: Transport>(&mut self, io: &mut IO) -> Result<Progress, Error> {
        while let Some(line) = io.read_line() {
            if is_key_line(&line) {
                let value = line[SEC_WEBSOCKET_KEY.len()..].trim_ascii();

                // a 16-byte key in base64 is always 24 characters
                if !is_valid_sec_key(value) {
                    warn!("client sec-websocket-key is invalid");
                    return Err(HandshakeError::SecWebSocketKey.into());
                }

                self.accept = Some(derive_accept_key(value));
            } else if strip_line_break(&line).is_empty() {
                // end of the header block
                let Some(accept) = self.accept else {
                    warn!("client sec-websocket-key is missing");
                    return Err(HandshakeError::MissingSecWebSocketKey.into());
                };

                io.write_bytes(SWITCHING_PROTOCOLS)?;
                io.write_bytes(&accept)?;
                io.write_bytes(HTTP_LINE_BREAK)?;
                io.write_bytes(HTTP_LINE_BREAK)?;
                io.flush()?;

                return Ok(Progress::Complete);
            }
        }

        Ok(Progress::Pending)
    }
}

impl Default for Negotiator {
    fn default() -> Self { Self::new() }
}

#[inline]
fn is_key_line(line: &[u8]) -> bool {
    line.len() >= SEC_WEBSOCKET_KEY.len()
        && line[..SEC_WEBSOCKET_KEY.len()].eq_ignore_ascii_case(SEC_WEBSOCKET_KEY)
}

#[inline]
fn is_valid_sec_key(value: &[u8]) -> bool {
    value.len() == 24 && matches!(STANDARD.decode(value), Ok(k) if k.len() == 16)
}

/// Line endings are the transport's business: a line reader may hand
/// back `\r\n` or a bare `\n`, both count.
#[inline]
fn strip_line_break(line: &[u8]) -> &[u8] {
    match line {
        [rest @ .., b'\r', b'\n'] => rest,
        [rest @ .., b'\n'] => rest,
        _ => line,
    }
}
