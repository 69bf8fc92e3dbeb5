// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Protocol-level errors. Per the error taxonomy in the kernel design, these
/// are resolved locally by the socket server (discard-and-resync) and never
/// surface to a syscall handler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("bad magic: expected {expected:#010x}, got {got:#010x}")]
    BadMagic { expected: u32, got: u32 },

    #[error("payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("incomplete frame: need {needed} more bytes")]
    Incomplete { needed: usize },

    #[error("connection closed")]
    ConnectionClosed,

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}
