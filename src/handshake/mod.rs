//! Websocket upgrade handshake, server side.
//!
//! From [RFC-6455 Section 4.2](https://datatracker.ietf.org/doc/html/rfc6455#section-4.2):
//!
//! When a client starts a WebSocket connection, it sends its part of
//! the opening handshake. The server must parse at least part of this
//! handshake in order to obtain the necessary information to generate
//! the server part of the handshake.
//!
//! Only the `Sec-WebSocket-Key` header is of interest here; the rest
//! of the request is not checked for http conformity. The negotiator
//! consumes the request line by line and answers with a fixed 101
//! response carrying the derived accept token.

pub mod key;
pub mod server;

pub use key::{derive_accept_key, AcceptKey};
pub use server::{Negotiator, Progress};

/// 258EAFA5-E914-47DA-95CA-C5AB0DC85B11
pub const GUID: &[u8] = b"258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// CRLF
pub const HTTP_LINE_BREAK: &[u8] = b"\r\n";

/// Header prefix the negotiator scans for, matched case-insensitively.
pub const SEC_WEBSOCKET_KEY: &[u8] = b"sec-websocket-key:";

/// The 101 response up to the accept token. The token and a double
/// CRLF complete it.
pub const SWITCHING_PROTOCOLS: &[u8] =
    b"HTTP/1.1 101 Switching Protocols\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Accept: ";
