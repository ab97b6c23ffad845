//! Websocket session.
//!
//! One [`Session`] per connection, owning the transport and every bit
//! of protocol state: the handshake negotiator, the decoder cursor and
//! the buffered application data. The embedding event loop drives it
//! with [`on_readable`](Session::on_readable) whenever transport bytes
//! may be ready; everything else is plain reads and writes.

mod decode;
mod queue;
mod state;

use log::debug;

use queue::ChunkQueue;
use state::ReadState;

use crate::error::Error;
use crate::frame::{FrameHead, MAX_HEAD_LEN};
use crate::handshake::{Negotiator, Progress};
use crate::transport::Transport;

/// Lifecycle of a session.
///
/// ```text
/// NotStarted -> Handshaking -> Open -> Closed
///                    |           |
///                    +-> Errored <+
/// ```
///
/// `Closed` (orderly, close frame exchanged) and `Errored` (protocol
/// violation) are terminal: no further bytes are processed and the
/// caller is expected to tear down the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Handshaking,
    Open,
    Closed,
    Errored,
}

/// A server-side websocket session over transport `IO`.
pub struct Session<IO> {
    io: IO,
    state: SessionState,
    negotiator: Negotiator,
    read_state: ReadState,
    queue: ChunkQueue,
}

impl<IO: Transport> Session<IO> {
    /// Wrap a freshly-accepted transport. The handshake starts on the
    /// first readable event.
    pub fn new(io: IO) -> Self {
        Session {
            io,
            state: SessionState::NotStarted,
            negotiator: Negotiator::new(),
            read_state: ReadState::new(),
            queue: ChunkQueue::new(),
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub const fn state(&self) -> SessionState { self.state }

    /// Drive the session after a transport-readable event.
    ///
    /// Routes to the handshake negotiator until the session opens,
    /// then to the frame decoder; frame bytes pipelined behind the
    /// handshake are decoded in the same call. Consumes whatever is
    /// buffered and returns, never blocks waiting for more.
    ///
    /// A protocol violation moves the session to
    /// [`SessionState::Errored`] before the error is returned, and
    /// every later call is a no-op. Transport errors pass through
    /// without touching the state.
    pub fn on_readable(&mut self) -> Result<(), Error> {
        if self.state == SessionState::NotStarted {
            self.state = SessionState::Handshaking;
        }

        let result = self.dispatch();
        if let Err(e) = &result {
            if e.is_protocol_violation() {
                self.state = SessionState::Errored;
            }
        }
        result
    }

    fn dispatch(&mut self) -> Result<(), Error> {
        if self.state == SessionState::Handshaking
            && self.negotiator.progress(&mut self.io)? == Progress::Complete
        {
            debug!("handshake complete, session open");
            self.state = SessionState::Open;
        }
        if self.state == SessionState::Open {
            self.drive_frames()?;
        }
        Ok(())
    }

    /// Send `payload` to the peer as one unmasked binary frame.
    /// A no-op unless the session is [`SessionState::Open`].
    pub fn write(&mut self, payload: &[u8]) -> Result<(), Error> {
        if self.state != SessionState::Open {
            return Ok(());
        }

        let mut head = [0u8; MAX_HEAD_LEN];
        let n = FrameHead::binary(payload.len() as u64).encode(&mut head);
        self.io.write_bytes(&head[..n])?;
        self.io.write_bytes(payload)?;
        Ok(())
    }

    /// Answer a ping; only the decoder calls this.
    fn write_pong(&mut self, payload: &[u8]) -> Result<(), Error> {
        let mut head = [0u8; MAX_HEAD_LEN];
        let n = FrameHead::pong(payload.len() as u64).encode(&mut head);
        self.io.write_bytes(&head[..n])?;
        self.io.write_bytes(payload)?;
        Ok(())
    }

    /// Copy up to `buf.len()` buffered application bytes into `buf`,
    /// returning the count copied; 0 when nothing is buffered.
    #[inline]
    pub fn read(&mut self, buf: &mut [u8]) -> usize { self.queue.read_into(buf) }

    /// Owned-buffer variant of [`read`](Self::read), sized to
    /// min(`max`, [`available`](Self::available)).
    #[inline]
    pub fn read_owned(&mut self, max: usize) -> Vec<u8> { self.queue.read_owned(max) }

    /// Count of buffered application bytes. O(1).
    #[inline]
    pub fn available(&self) -> usize { self.queue.available() }
}

impl<IO> AsRef<IO> for Session<IO> {
    #[inline]
    fn as_ref(&self) -> &IO { &self.io }
}

impl<IO> AsMut<IO> for Session<IO> {
    #[inline]
    fn as_mut(&mut self) -> &mut IO { &mut self.io }
}

impl<IO> Session<IO> {
    /// Unwrap the transport, dropping all session state.
    #[inline]
    pub fn into_inner(self) -> IO { self.io }
}

impl<IO> std::fmt::Debug for Session<IO> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("read_state", &self.read_state)
            .field("available", &self.queue.available())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frame::MaskKey;
    use crate::transport::BufferedTransport;
    use std::io::{Read, Result, Write};

    pub const REQUEST: &[u8] = b"GET /ws HTTP/1.1\r\n\
        Host: www.example.com\r\n\
        Upgrade: websocket\r\n\
        Connection: Upgrade\r\n\
        Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
        Sec-WebSocket-Version: 13\r\n\
        \r\n";

    pub const RESPONSE: &[u8] = b"HTTP/1.1 101 Switching Protocols\r\n\
        Upgrade: websocket\r\n\
        Connection: Upgrade\r\n\
        Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n\
        \r\n";

    struct Duplex {
        rbuf: Vec<u8>,
        wbuf: Vec<u8>,
        cursor: usize,
    }

    impl Read for Duplex {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            let n = std::cmp::min(buf.len(), self.rbuf.len() - self.cursor);
            buf[..n].copy_from_slice(&self.rbuf[self.cursor..self.cursor + n]);
            self.cursor += n;
            Ok(n)
        }
    }

    impl Write for Duplex {
        fn write(&mut self, buf: &[u8]) -> Result<usize> { self.wbuf.write(buf) }

        fn flush(&mut self) -> Result<()> { Ok(()) }
    }

    fn session(inbound: &[u8]) -> Session<BufferedTransport<Duplex>> {
        let mut io = BufferedTransport::new(Duplex {
            rbuf: inbound.to_vec(),
            wbuf: Vec::new(),
            cursor: 0,
        });
        io.fill().unwrap();
        Session::new(io)
    }

    fn masked(payload: &[u8], key: [u8; 4]) -> Vec<u8> {
        let mut data = payload.to_vec();
        // masking and unmasking are the same xor
        MaskKey::new(key).unmask(&mut data);
        data
    }

    #[test]
    fn handshake_then_pipelined_frame() {
        let key = [0x11, 0x22, 0x33, 0x44];
        let mut inbound = REQUEST.to_vec();
        inbound.extend_from_slice(&[0x82, 0x85]);
        inbound.extend_from_slice(&key);
        inbound.extend_from_slice(&masked(b"hello", key));

        let mut session = session(&inbound);
        assert_eq!(session.state(), SessionState::NotStarted);

        // one event carries the handshake and the first frame
        session.on_readable().unwrap();
        assert_eq!(session.state(), SessionState::Open);
        assert_eq!(session.available(), 5);
        assert_eq!(session.read_owned(16), b"hello");

        let wbuf = &session.as_ref().get_ref().wbuf;
        assert_eq!(wbuf, &RESPONSE);
    }

    #[test]
    fn write_is_gated_on_open() {
        let mut session = session(REQUEST);

        // nothing may be sent before the handshake completes
        session.write(b"too early").unwrap();
        assert!(session.as_ref().get_ref().wbuf.is_empty());

        session.on_readable().unwrap();
        assert_eq!(session.state(), SessionState::Open);
        session.write(b"hi").unwrap();

        let wbuf = &session.as_ref().get_ref().wbuf;
        assert_eq!(&wbuf[RESPONSE.len()..], &[0x82, 0x02, b'h', b'i']);
    }

    #[test]
    fn close_is_echoed_once() {
        let key = [9, 9, 9, 9];
        let mut inbound = REQUEST.to_vec();
        inbound.extend_from_slice(&[0x88, 0x80]);
        inbound.extend_from_slice(&key);
        // a pipelined data frame behind the close is never processed
        inbound.extend_from_slice(&[0x82, 0x81]);
        inbound.extend_from_slice(&key);
        inbound.extend_from_slice(&masked(b"x", key));

        let mut session = session(&inbound);
        session.on_readable().unwrap();
        assert_eq!(session.state(), SessionState::Closed);

        let wbuf = session.as_ref().get_ref().wbuf.clone();
        assert_eq!(&wbuf[RESPONSE.len()..], &[0x88, 0x00]);

        // terminal: later events change nothing
        session.on_readable().unwrap();
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.available(), 0);
        assert_eq!(session.as_ref().get_ref().wbuf, wbuf);

        // and writes are dropped
        session.write(b"gone").unwrap();
        assert_eq!(session.as_ref().get_ref().wbuf, wbuf);
    }

    #[test]
    fn unmasked_frame_is_fatal() {
        let mut inbound = REQUEST.to_vec();
        inbound.extend_from_slice(&[0x82, 0x05]);
        inbound.extend_from_slice(b"hello");

        let mut session = session(&inbound);
        let err = session.on_readable().unwrap_err();
        assert!(err.is_protocol_violation());
        assert_eq!(session.state(), SessionState::Errored);

        // halted: the rest of the buffer is never decoded
        session.on_readable().unwrap();
        assert_eq!(session.available(), 0);
    }

    #[test]
    fn reserved_opcode_is_fatal() {
        let key = [1, 2, 3, 4];
        let mut inbound = REQUEST.to_vec();
        inbound.extend_from_slice(&[0x83, 0x80]);
        inbound.extend_from_slice(&key);

        let mut session = session(&inbound);
        assert!(session.on_readable().is_err());
        assert_eq!(session.state(), SessionState::Errored);
    }

    #[test]
    fn bad_handshake_is_fatal() {
        let mut session = session(b"GET / HTTP/1.1\r\nSec-WebSocket-Key: short\r\n\r\n");
        let err = session.on_readable().unwrap_err();
        assert!(err.is_protocol_violation());
        assert_eq!(session.state(), SessionState::Errored);
        assert!(session.as_ref().get_ref().wbuf.is_empty());
    }
}
