// SPDX-License-Identifier: MIT

//! `TUNNEL_CONNECT`/`TUNNEL_DISCONNECT`/`TUNNEL_STATUS`/
//! `TUNNEL_LIST_REMOTES`/`TUNNEL_CONFIG` (§4.13).

use clove_agent::AgentAdapter;
use clove_core::{Clock, Value};
use crate::tunnel::TunnelConfig;

use crate::dispatcher::{fail, ok_with};
use crate::kernel::Kernel;

pub fn connect<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>) -> Value {
    match kernel.tunnel.connect() {
        Ok(()) => crate::dispatcher::ok(),
        Err(e) => fail(e),
    }
}

pub fn disconnect<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>) -> Value {
    kernel.tunnel.disconnect();
    crate::dispatcher::ok()
}

pub fn status<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>) -> Value {
    let mut fields = serde_json::Map::new();
    fields.insert("status".to_string(), serde_json::json!(kernel.tunnel.status()));
    ok_with(fields)
}

pub fn list_remotes<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>) -> Value {
    let mut fields = serde_json::Map::new();
    fields.insert(
        "remotes".to_string(),
        serde_json::json!(kernel.tunnel.list_remotes()),
    );
    ok_with(fields)
}

pub fn config<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>, request: &Value) -> Value {
    match serde_json::from_value::<TunnelConfig>(request.clone()) {
        Ok(config) => {
            kernel.tunnel.set_config(config);
            let mut fields = serde_json::Map::new();
            fields.insert("status".to_string(), serde_json::json!(kernel.tunnel.status()));
            ok_with(fields)
        }
        Err(e) => fail(format!("invalid tunnel config: {e}")),
    }
}
