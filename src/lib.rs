//! Server-side websocket engine for event-driven transports.
//!
//! The engine performs the opening HTTP upgrade handshake, then decodes
//! incoming [RFC-6455](https://datatracker.ietf.org/doc/html/rfc6455)
//! frames as bytes trickle in from the transport. Control traffic is
//! answered internally (ping is ponged, close is echoed) and only
//! application payload bytes are buffered for the caller. Text, binary
//! and continuation frames are all treated as raw data; websocket
//! message boundaries and fragmentation are discarded.
//!
//! ## Features
//! - Resumable frame decoding across arbitrarily fragmented reads.
//! - Transparent ping/pong/close handling.
//! - Buffered application data with streaming reads.
//! - No threads and no blocking IO of its own.
//!
//! ## Usage
//!
//! The engine owns a [`Transport`](transport::Transport) and is driven
//! by an external event loop whenever bytes may be available:
//!
//! ```ignore
//! {
//!     let mut session = Session::new(BufferedTransport::new(tcp));
//!
//!     // on every readable event:
//!     session.as_mut().fill()?;
//!     session.on_readable()?;
//!
//!     // consume application data
//!     let n = session.read(&mut buf);
//!
//!     // send a binary message
//!     session.write(&data)?;
//! }
//! ```
//!
//! Only the server role is implemented; frames sent by the engine are
//! never masked, frames received must be.

pub mod error;
pub mod frame;
pub mod handshake;
pub mod session;
pub mod transport;
