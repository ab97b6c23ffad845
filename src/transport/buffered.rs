//! Inbound buffering over a plain byte stream.

use std::cmp;
use std::io::{ErrorKind, Read, Result, Write};

use bytes::{Buf, BytesMut};

use super::Transport;

/// Bytes pulled off the stream per [`fill`](BufferedTransport::fill).
const FILL_CHUNK: usize = 4096;

/// [`Transport`] over any `Read + Write` byte stream.
///
/// Keeps an inbound buffer that the engine's counted reads and line
/// reads are served from. The owner decides when the buffer is topped
/// up: call [`fill`](BufferedTransport::fill) once per readable event,
/// then hand the session its
/// [`on_readable`](crate::session::Session::on_readable). Writes are
/// passed straight through to the stream.
#[derive(Debug)]
pub struct BufferedTransport<S> {
    stream: S,
    inbound: BytesMut,
}

impl<S: Read + Write> BufferedTransport<S> {
    #[inline]
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            inbound: BytesMut::new(),
        }
    }

    /// Pull once from the stream into the inbound buffer, returning
    /// the count of new bytes. A would-block read counts as 0 so a
    /// non-blocking socket can be polled without special casing; 0 on
    /// a blocking socket means EOF.
    pub fn fill(&mut self) -> Result<usize> {
        let mut chunk = [0u8; FILL_CHUNK];
        match self.stream.read(&mut chunk) {
            Ok(n) => {
                self.inbound.extend_from_slice(&chunk[..n]);
                Ok(n)
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Get the underlying stream.
    #[inline]
    pub fn get_ref(&self) -> &S { &self.stream }

    /// Get the underlying stream.
    #[inline]
    pub fn get_mut(&mut self) -> &mut S { &mut self.stream }

    /// Unwrap, discarding buffered inbound bytes.
    #[inline]
    pub fn into_inner(self) -> S { self.stream }
}

impl<S: Read + Write> Transport for BufferedTransport<S> {
    #[inline]
    fn bytes_available(&self) -> usize { self.inbound.len() }

    fn read_bytes(&mut self, buf: &mut [u8]) -> usize {
        let n = cmp::min(buf.len(), self.inbound.len());
        buf[..n].copy_from_slice(&self.inbound[..n]);
        self.inbound.advance(n);
        n
    }

    fn skip(&mut self, n: usize) -> usize {
        let n = cmp::min(n, self.inbound.len());
        self.inbound.advance(n);
        n
    }

    fn can_read_line(&self) -> bool { self.inbound.contains(&b'\n') }

    fn read_line(&mut self) -> Option<Vec<u8>> {
        let end = self.inbound.iter().position(|&b| b == b'\n')?;
        Some(self.inbound.split_to(end + 1).to_vec())
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> { self.stream.write_all(buf) }

    fn flush(&mut self) -> Result<()> { self.stream.flush() }
}
