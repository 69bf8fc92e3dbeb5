// SPDX-License-Identifier: MIT

//! The structured-value type carried in mailbox messages, state entries,
//! event payloads, and syscall request/response bodies. Every wire payload
//! (aside from `NOOP`'s opaque bytes) is a UTF-8 JSON object, so this is a
//! thin alias rather than a bespoke enum — it keeps serde derives on every
//! request/response type trivial.

/// A JSON value used wherever the spec calls for a "structured-value".
pub type Value = serde_json::Value;
