//! §8 scenario 1 ("Echo") and the monotonic-id invariant.

use crate::prelude::*;
use clove_wire::Opcode;

#[test]
fn noop_echoes_payload_and_assigns_kernel_id() {
    let kernel = Kernel::start();
    let client = kernel.connect();

    // `Client::connect` already round-tripped one `NOOP` as its handshake;
    // the assigned id must be non-zero (0 is reserved for the kernel).
    assert_ne!(client.agent_id, 0);
}

#[test]
fn noop_echo_is_exact_byte_for_byte() {
    let kernel = Kernel::start();
    let mut client = kernel.connect();

    let payload = b"hello".to_vec();
    let response = client.call_raw(Opcode::Noop, payload.clone());

    assert_eq!(response.opcode, Opcode::Noop.as_u8());
    assert_eq!(response.payload, payload);
    assert_eq!(response.agent_id.0, client.agent_id, "response carries the kernel-assigned id");
}

#[test]
fn agent_ids_are_strictly_increasing_across_accepted_clients() {
    let kernel = Kernel::start();

    let clients: Vec<Client> = (0..5).map(|_| kernel.connect()).collect();
    let ids: Vec<u32> = clients.iter().map(|c| c.agent_id).collect();

    for window in ids.windows(2) {
        assert!(
            window[1] > window[0],
            "expected strictly increasing ids, got {ids:?}"
        );
    }
}
