//! §4.1 framing edge cases: a parser must reject bad-magic or oversized-
//! payload headers and resynchronize by discarding exactly one header's
//! worth of bytes, never dropping a legitimate frame that follows.

use crate::prelude::*;
use clove_wire::{Opcode, HEADER_LEN, MAGIC, MAX_PAYLOAD_SIZE};

fn good_frame_bytes(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    clove_wire::Frame::new(clove_core::AgentId(0), Opcode::Noop, payload.to_vec())
        .encode(&mut out)
        .expect("encode");
    out
}

#[test]
fn bad_magic_header_is_skipped_and_following_frame_still_parses() {
    let kernel = Kernel::start();
    let mut client = kernel.connect();

    let mut garbage = vec![0xFFu8; HEADER_LEN];
    // Make sure these bytes really don't decode as the magic by construction.
    garbage[0..4].copy_from_slice(&0xDEAD_BEEFu32.to_ne_bytes());

    let mut stream = garbage;
    stream.extend_from_slice(&good_frame_bytes(b"still alive"));

    client.write_raw_bytes(&stream);
    let response = client.read_frame();

    assert_eq!(response.payload, b"still alive");
}

#[test]
fn oversized_payload_header_is_skipped_and_following_frame_still_parses() {
    let kernel = Kernel::start();
    let mut client = kernel.connect();

    let mut header = Vec::with_capacity(HEADER_LEN);
    header.extend_from_slice(&MAGIC.to_ne_bytes());
    header.extend_from_slice(&0u32.to_ne_bytes());
    header.push(Opcode::Noop.as_u8());
    header.extend_from_slice(&(MAX_PAYLOAD_SIZE + 1).to_ne_bytes());
    assert_eq!(header.len(), HEADER_LEN);

    let mut stream = header;
    stream.extend_from_slice(&good_frame_bytes(b"survived"));

    client.write_raw_bytes(&stream);
    let response = client.read_frame();

    assert_eq!(response.payload, b"survived");
}
