#![allow(dead_code)]

use std::io::{Read, Result, Write};

use evws::error::Error;
use evws::session::Session;
use evws::transport::BufferedTransport;

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

/// In-memory peer handing out reads in `rlimit`-sized pieces.
pub struct LimitReadWriter {
    pub rbuf: Vec<u8>,
    pub wbuf: Vec<u8>,
    pub rlimit: usize,
    pub cursor: usize,
}

impl Read for LimitReadWriter {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let left = self.rbuf.len() - self.cursor;
        let n = left.min(self.rlimit).min(buf.len());
        buf[..n].copy_from_slice(&self.rbuf[self.cursor..self.cursor + n]);
        self.cursor += n;
        Ok(n)
    }
}

impl Write for LimitReadWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize> { self.wbuf.write(buf) }

    fn flush(&mut self) -> Result<()> { Ok(()) }
}

pub type TestSession = Session<BufferedTransport<LimitReadWriter>>;

/// A session whose peer will deliver `inbound`, `rlimit` bytes per read.
pub fn session_with(inbound: Vec<u8>, rlimit: usize) -> TestSession {
    Session::new(BufferedTransport::new(LimitReadWriter {
        rbuf: inbound,
        wbuf: Vec::new(),
        rlimit,
        cursor: 0,
    }))
}

/// Fill and drive until the peer has nothing left to deliver.
pub fn pump(session: &mut TestSession) -> std::result::Result<(), Error> {
    loop {
        let n = session.as_mut().fill()?;
        session.on_readable()?;
        if n == 0 {
            return Ok(());
        }
    }
}

/// Everything the session's peer has been sent so far.
pub fn written(session: &TestSession) -> &[u8] {
    &session.as_ref().get_ref().wbuf
}

/// Build a masked client-to-server frame, fin bit set.
pub fn client_frame(opcode: u8, payload: &[u8], key: [u8; 4]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + 14);
    frame.push(0x80 | opcode);

    let len = payload.len();
    if len <= 125 {
        frame.push(0x80 | len as u8);
    } else if len <= 65535 {
        frame.push(0x80 | 126);
        frame.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        frame.push(0x80 | 127);
        frame.extend_from_slice(&(len as u64).to_be_bytes());
    }

    frame.extend_from_slice(&key);
    for (i, b) in payload.iter().enumerate() {
        frame.push(b ^ key[i & 3]);
    }
    frame
}

pub fn rand_key() -> [u8; 4] { rand::random() }

pub fn rand_payload(len: usize) -> Vec<u8> {
    (0..len).map(|_| rand::random()).collect()
}

/// Read one unmasked server frame off a blocking stream, returning
/// its opcode and payload.
pub fn read_server_frame<S: Read>(stream: &mut S) -> (u8, Vec<u8>) {
    let mut head = [0u8; 2];
    stream.read_exact(&mut head).unwrap();
    assert_eq!(head[1] & 0x80, 0, "server frames are unmasked");

    let len = match head[1] & 0x7f {
        126 => {
            let mut ext = [0u8; 2];
            stream.read_exact(&mut ext).unwrap();
            u16::from_be_bytes(ext) as u64
        }
        127 => {
            let mut ext = [0u8; 8];
            stream.read_exact(&mut ext).unwrap();
            u64::from_be_bytes(ext)
        }
        n => n as u64,
    };

    let mut payload = vec![0u8; len as usize];
    stream.read_exact(&mut payload).unwrap();
    (head[0] & 0x0f, payload)
}
