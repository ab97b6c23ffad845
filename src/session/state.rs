use crate::frame::MaskKey;

/// What the payload being decoded is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PayloadKind {
    /// continuation, text and binary frames all land in the data queue
    Data,
    Ping,
    Pong,
}

/// Decoder cursor.
///
/// One variant per frame field the decoder may be waiting on, carrying
/// everything learned so far. The cursor lives in the session between
/// calls, which is what lets a frame arrive in arbitrary pieces: each
/// drain pass resumes exactly where the last one suspended, including
/// the rolling mask offset inside `Payload`.
#[derive(Debug, Clone, Copy)]
pub(super) enum ReadState {
    /// opcode byte + mask bit + 7-bit length code, 2 bytes
    Head,
    /// 16-bit extended length, 2 bytes
    ExtLength16 { kind: PayloadKind },
    /// 64-bit extended length, 8 bytes
    ExtLength64 { kind: PayloadKind },
    /// mask key, 4 bytes
    MaskKey { kind: PayloadKind, length: u64 },
    /// payload bytes until `remaining` hits 0
    Payload {
        kind: PayloadKind,
        remaining: u64,
        mask: MaskKey,
    },
}

impl ReadState {
    #[inline]
    pub const fn new() -> Self { ReadState::Head }
}
