// SPDX-License-Identifier: MIT

//! `RECORD_START`/`RECORD_STOP`/`RECORD_STATUS`/`REPLAY_START`/
//! `REPLAY_STATUS` (§4.12).

use clove_agent::AgentAdapter;
use clove_audit::{RecordingConfig, RecordingEntry, ReplayLog};
use clove_core::{Clock, Value};

use crate::dispatcher::{fail, ok_with};
use crate::kernel::Kernel;

pub fn record_start<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>, request: &Value) -> Value {
    if let Some(config_value) = request.get("config") {
        match serde_json::from_value::<RecordingConfig>(config_value.clone()) {
            Ok(config) => kernel.execution.set_config(config),
            Err(e) => return fail(format!("invalid `config`: {e}")),
        }
    }
    kernel.execution.start();
    crate::dispatcher::ok()
}

pub fn record_stop<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>) -> Value {
    kernel.execution.stop();
    crate::dispatcher::ok()
}

pub fn record_status<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>) -> Value {
    let mut fields = serde_json::Map::new();
    fields.insert("state".to_string(), serde_json::json!(kernel.execution.state()));
    fields.insert(
        "count".to_string(),
        serde_json::json!(kernel.execution.buffer().len()),
    );
    ok_with(fields)
}

pub fn replay_start<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>, request: &Value) -> Value {
    let Some(entries_value) = request.get("entries") else {
        return fail("missing `entries` field");
    };
    match serde_json::from_value::<Vec<RecordingEntry>>(entries_value.clone()) {
        Ok(entries) => {
            kernel.replay = Some(ReplayLog::new(entries));
            crate::dispatcher::ok()
        }
        Err(e) => fail(format!("invalid `entries`: {e}")),
    }
}

pub fn replay_status<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>) -> Value {
    let mut fields = serde_json::Map::new();
    match &kernel.replay {
        Some(replay) => {
            fields.insert("state".to_string(), serde_json::json!(replay.state()));
            fields.insert("cursor".to_string(), serde_json::json!(replay.cursor()));
            fields.insert("total".to_string(), serde_json::json!(replay.total()));
        }
        None => {
            fields.insert("state".to_string(), serde_json::json!("idle"));
            fields.insert("cursor".to_string(), serde_json::json!(0));
            fields.insert("total".to_string(), serde_json::json!(0));
        }
    }
    ok_with(fields)
}
