// SPDX-License-Identifier: MIT

//! The pub/sub event bus backing `SUBSCRIBE`/`UNSUBSCRIBE`/`POLL_EVENTS`/
//! `EMIT` (§4.10): per-agent subscription sets and bounded, oldest-drop
//! delivery queues.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod bus;
mod event;

pub use bus::{EventBus, DEFAULT_QUEUE_CAPACITY, RESOURCE_WARNING_DEBOUNCE_MS};
pub use event::{Event, EventType};
