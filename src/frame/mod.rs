//! Websocket data frame.
//!
//! [RFC-6455 Section5](https://datatracker.ietf.org/doc/html/rfc6455#section-5)
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
//! |I|S|S|S|  (4)  |A|     (7)     |             (16/64)           |
//! |N|V|V|V|       |S|             |   (if payload len==126/127)   |
//! | |1|2|3|       |K|             |                               |
//! +-+-+-+-+-------+-+-------------+ - - - - - - - - - - - - - - - +
//! |     Extended payload length continued, if payload len == 127  |
//! + - - - - - - - - - - - - - - - +-------------------------------+
//! |                               |Masking-key, if MASK set to 1  |
//! +-------------------------------+-------------------------------+
//! | Masking-key (continued)       |          Payload Data         |
//! +-------------------------------- - - - - - - - - - - - - - - - +
//! :                     Payload Data continued ...                :
//! + - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - +
//! |                     Payload Data continued ...                |
//! +---------------------------------------------------------------+
//! ```
//!
//! This module holds the pieces of the frame head and the outbound
//! encoder. Inbound heads are not parsed here: the decoder in
//! [`session`](crate::session) consumes them field by field so it can
//! suspend between any two of them.

pub mod flag;
pub mod length;
pub mod mask;

pub use flag::{Fin, OpCode};
pub use length::PayloadLen;
pub use mask::MaskKey;

/// Head bytes of the longest frame the engine sends: flags + length
/// code + 64-bit extended length. Server frames carry no mask key.
pub const MAX_HEAD_LEN: usize = 2 + 8;

/// Head of an outbound server-to-client frame.
///
/// Server frames are sent unmasked, so the head is fully described by
/// the fin flag, the opcode and the payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHead {
    pub fin: Fin,
    pub opcode: OpCode,
    pub length: PayloadLen,
}

impl FrameHead {
    /// Constructor.
    #[inline]
    pub const fn new(fin: Fin, opcode: OpCode, length: PayloadLen) -> Self {
        Self {
            fin,
            opcode,
            length,
        }
    }

    /// Head of a single-frame binary message.
    #[inline]
    pub const fn binary(len: u64) -> Self {
        Self::new(Fin::Y, OpCode::Binary, PayloadLen::from_num(len))
    }

    /// Head of a pong answering a ping of length `len`.
    #[inline]
    pub const fn pong(len: u64) -> Self {
        Self::new(Fin::Y, OpCode::Pong, PayloadLen::from_num(len))
    }

    /// Head of the empty close frame echoed back to the peer.
    #[inline]
    pub const fn close() -> Self {
        Self::new(Fin::Y, OpCode::Close, PayloadLen::Short(0))
    }

    /// Encode into the provided buffer, returns the count of written
    /// bytes. The mask bit stays clear.
    pub fn encode(&self, buf: &mut [u8; MAX_HEAD_LEN]) -> usize {
        // fin, opcode
        buf[0] = self.fin as u8 | self.opcode as u8;

        // length code, then the extended field it announces
        buf[1] = self.length.flag_byte();

        match self.length {
            PayloadLen::Short(_) => 2,
            PayloadLen::Ext16(v) => {
                buf[2..4].copy_from_slice(&v.to_be_bytes());
                4
            }
            PayloadLen::Ext64(v) => {
                buf[2..10].copy_from_slice(&v.to_be_bytes());
                10
            }
        }
    }
}
