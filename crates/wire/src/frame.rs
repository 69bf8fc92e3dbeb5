// SPDX-License-Identifier: MIT

use clove_core::AgentId;

use crate::error::ProtocolError;
use crate::opcode::Opcode;

/// The four bytes `A`, `G`, `N`, `T`.
pub const MAGIC: u32 = 0x4147_4E54;

/// `magic(4) + agent_id(4) + opcode(1) + payload_size(8)`.
pub const HEADER_LEN: usize = 17;

/// No single frame payload may exceed this, regardless of opcode.
pub const MAX_PAYLOAD_SIZE: u64 = 1024 * 1024;

/// A fully decoded wire frame: a target/source agent id, an opcode, and its
/// payload bytes (almost always UTF-8 JSON; `NOOP` is the one opcode that
/// tolerates arbitrary bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub agent_id: AgentId,
    pub opcode: u8,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(agent_id: AgentId, opcode: Opcode, payload: Vec<u8>) -> Self {
        Self {
            agent_id,
            opcode: opcode.as_u8(),
            payload,
        }
    }

    /// Encode the header and payload into `out`, appending rather than
    /// truncating so callers can build up a socket write buffer.
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
        let payload_size = self.payload.len() as u64;
        if payload_size > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload_size,
                limit: MAX_PAYLOAD_SIZE,
            });
        }
        out.reserve(HEADER_LEN + self.payload.len());
        out.extend_from_slice(&MAGIC.to_ne_bytes());
        out.extend_from_slice(&self.agent_id.0.to_ne_bytes());
        out.push(self.opcode);
        out.extend_from_slice(&payload_size.to_ne_bytes());
        out.extend_from_slice(&self.payload);
        Ok(())
    }

    /// Try to decode one frame from the front of `buf`.
    ///
    /// Returns `Ok(Some((frame, consumed)))` when a complete frame is
    /// present, `Ok(None)` when `buf` holds a well-formed but incomplete
    /// prefix, and `Err` when the header itself is malformed (bad magic or a
    /// payload size over the cap). On error the caller must resynchronize by
    /// discarding exactly [`HEADER_LEN`] bytes and retrying — never more,
    /// since the bad header might just be the tail of a previous frame's
    /// payload bleeding into this one, and discarding more could skip over a
    /// legitimate frame that starts partway through.
    pub fn decode(buf: &[u8]) -> Result<Option<(Frame, usize)>, ProtocolError> {
        if buf.len() < HEADER_LEN {
            return Ok(None);
        }

        let mut magic_bytes = [0u8; 4];
        magic_bytes.copy_from_slice(&buf[0..4]);
        let magic = u32::from_ne_bytes(magic_bytes);
        if magic != MAGIC {
            return Err(ProtocolError::BadMagic {
                expected: MAGIC,
                got: magic,
            });
        }

        let mut agent_id_bytes = [0u8; 4];
        agent_id_bytes.copy_from_slice(&buf[4..8]);
        let agent_id = u32::from_ne_bytes(agent_id_bytes);
        let opcode = buf[8];
        let mut size_bytes = [0u8; 8];
        size_bytes.copy_from_slice(&buf[9..17]);
        let payload_size = u64::from_ne_bytes(size_bytes);

        if payload_size > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload_size,
                limit: MAX_PAYLOAD_SIZE,
            });
        }

        let total_len = HEADER_LEN + payload_size as usize;
        if buf.len() < total_len {
            return Ok(None);
        }

        let payload = buf[HEADER_LEN..total_len].to_vec();
        Ok(Some((
            Frame {
                agent_id: AgentId(agent_id),
                opcode,
                payload,
            },
            total_len,
        )))
    }
}

/// Scan forward past exactly one header's worth of bytes, the resync step a
/// socket server runs after [`Frame::decode`] returns [`ProtocolError::BadMagic`]
/// or [`ProtocolError::PayloadTooLarge`].
pub fn resync_skip(buf: &[u8]) -> usize {
    buf.len().min(HEADER_LEN)
}
