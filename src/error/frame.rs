use std::fmt::{Display, Formatter};

/// Frame-level protocol violation.
///
/// Any of these is fatal to the session; the decoder does not attempt
/// to resynchronize after malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    IllegalOpCode,

    IllegalMask,
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use FrameError::*;
        match self {
            IllegalOpCode => write!(f, "Unknown or reserved opcode"),
            IllegalMask => write!(f, "Mask bit not set on client frame"),
        }
    }
}

// use default impl
impl std::error::Error for FrameError {}
