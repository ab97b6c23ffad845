//! The frame decoder drain loop.

use std::cmp;

use bytes::Bytes;
use log::{debug, warn};

use super::state::{PayloadKind, ReadState};
use super::{Session, SessionState};
use crate::error::{Error, FrameError};
use crate::frame::{FrameHead, MaskKey, OpCode, MAX_HEAD_LEN};
use crate::transport::Transport;

impl<IO: Transport> Session<IO> {
    /// Drain as many decoder states as the buffered bytes allow, then
    /// suspend. Each pass resumes from the exact field (and, inside a
    /// payload, the exact mask offset) where the previous one ran out
    /// of bytes.
    pub(super) fn drive_frames(&mut self) -> Result<(), Error> {
        loop {
            let available = self.io.bytes_available();

            match self.read_state {
                ReadState::Head => {
                    if available < 2 {
                        return Ok(());
                    }

                    let mut head = [0u8; 2];
                    self.io.read_bytes(&mut head);

                    let opcode = match OpCode::from_flag(head[0]) {
                        Ok(opcode) => opcode,
                        Err(e) => {
                            warn!("unknown frame type {:#03x}", head[0] & 0x0f);
                            return Err(e.into());
                        }
                    };

                    if opcode == OpCode::Close {
                        // a close frame may carry masked data describing
                        // the cause; it is never read, the echo ends the
                        // session first
                        let mut echo = [0u8; MAX_HEAD_LEN];
                        let n = FrameHead::close().encode(&mut echo);
                        self.io.write_bytes(&echo[..n])?;
                        self.state = SessionState::Closed;
                        debug!("close frame echoed, session closed");
                        return Ok(());
                    }

                    // frames from a client are always masked
                    if head[1] & 0x80 == 0 {
                        warn!("mask bit not set on client frame");
                        return Err(FrameError::IllegalMask.into());
                    }

                    let kind = match opcode {
                        OpCode::Continue | OpCode::Text | OpCode::Binary => PayloadKind::Data,
                        OpCode::Ping => PayloadKind::Ping,
                        OpCode::Pong => PayloadKind::Pong,
                        OpCode::Close => unreachable!(),
                    };

                    let code = head[1] & 0x7f;
                    self.read_state = if code <= 125 {
                        ReadState::MaskKey {
                            kind,
                            length: code as u64,
                        }
                    } else if code == 126 {
                        ReadState::ExtLength16 { kind }
                    } else {
                        ReadState::ExtLength64 { kind }
                    };
                }

                ReadState::ExtLength16 { kind } => {
                    if available < 2 {
                        return Ok(());
                    }

                    let mut len = [0u8; 2];
                    self.io.read_bytes(&mut len);
                    self.read_state = ReadState::MaskKey {
                        kind,
                        length: u16::from_be_bytes(len) as u64,
                    };
                }

                ReadState::ExtLength64 { kind } => {
                    if available < 8 {
                        return Ok(());
                    }

                    let mut len = [0u8; 8];
                    self.io.read_bytes(&mut len);
                    self.read_state = ReadState::MaskKey {
                        kind,
                        length: u64::from_be_bytes(len),
                    };
                }

                ReadState::MaskKey { kind, length } => {
                    if available < 4 {
                        return Ok(());
                    }

                    let mut key = [0u8; 4];
                    self.io.read_bytes(&mut key);
                    self.read_state = ReadState::Payload {
                        kind,
                        remaining: length,
                        mask: MaskKey::new(key),
                    };
                }

                ReadState::Payload {
                    kind,
                    remaining,
                    mask,
                } => match kind {
                    PayloadKind::Pong => {
                        // unsolicited pong data is dropped; no unmask
                        // needed for bytes that are thrown away
                        if remaining > available as u64 {
                            return Ok(());
                        }
                        self.io.skip(remaining as usize);
                        self.read_state = ReadState::new();
                    }

                    PayloadKind::Ping => {
                        // echoed back once the whole payload is here
                        if remaining > available as u64 {
                            return Ok(());
                        }
                        let mut payload = vec![0u8; remaining as usize];
                        self.io.read_bytes(&mut payload);
                        let mut mask = mask;
                        mask.unmask(&mut payload);
                        self.write_pong(&payload)?;
                        self.read_state = ReadState::new();
                    }

                    PayloadKind::Data => {
                        if remaining == 0 {
                            self.read_state = ReadState::new();
                            continue;
                        }
                        if available == 0 {
                            return Ok(());
                        }

                        // the payload need not arrive in one piece
                        let take = cmp::min(remaining, available as u64) as usize;
                        let mut chunk = vec![0u8; take];
                        let n = self.io.read_bytes(&mut chunk);
                        chunk.truncate(n);

                        let mut mask = mask;
                        mask.unmask(&mut chunk);
                        self.queue.push(Bytes::from(chunk));

                        let remaining = remaining - n as u64;
                        self.read_state = if remaining == 0 {
                            ReadState::new()
                        } else {
                            ReadState::Payload {
                                kind,
                                remaining,
                                mask,
                            }
                        };
                    }
                },
            }
        }
    }
}
