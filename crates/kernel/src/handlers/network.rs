// SPDX-License-Identifier: MIT

//! `HTTP` (§4.6, §9 Open Questions): outbound requests are delegated to a
//! `curl` subprocess, which owns its own request-level timeout (`--max-time`)
//! rather than the kernel polling a child like `EXEC` does. Unlike a naive
//! port of the original implementation, this returns curl's actual recorded
//! status code rather than hardcoding 200 regardless of outcome (the
//! redesign flag called out in §9: a fixed 200 would misreport every 4xx/5xx
//! response as success).

use std::process::Command;

use clove_agent::AgentAdapter;
use clove_core::{AgentId, Clock, Value};

use crate::dispatcher::{deny, fail, ok_with};
use crate::kernel::Kernel;

pub fn http<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let Some(url) = request.get("url").and_then(Value::as_str) else {
        return fail("missing `url` field");
    };

    let record = kernel.permissions.get_or_create(agent_id).clone();
    if !record.can_access_domain(url) {
        return deny(kernel, agent_id, clove_wire::Opcode::Http, "domain not allowed");
    }

    let method = request
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or("GET")
        .to_uppercase();
    let timeout_ms = request.get("timeout_ms").and_then(Value::as_u64).unwrap_or(10_000);
    let timeout_secs = (timeout_ms / 1_000).max(1);

    let mut cmd = Command::new("curl");
    cmd.arg("-s")
        .arg("-S")
        .arg("-X")
        .arg(&method)
        .arg("--max-time")
        .arg(timeout_secs.to_string());

    if let Some(headers) = request.get("headers").and_then(Value::as_object) {
        for (k, v) in headers {
            if let Some(v) = v.as_str() {
                cmd.arg("-H").arg(format!("{k}: {v}"));
            }
        }
    }
    if let Some(body) = request.get("body").and_then(Value::as_str) {
        cmd.arg("-d").arg(body);
    }
    // `%{http_code}` appended on its own trailing line so the body and the
    // real status code can be told apart after the fact.
    cmd.arg("-w").arg("\n%{http_code}").arg(url);

    match cmd.output() {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let (body, status) = match stdout.rsplit_once('\n') {
                Some((body, status)) => (body.to_string(), status.trim().parse::<u16>().ok()),
                None => (stdout.into_owned(), None),
            };
            let mut fields = serde_json::Map::new();
            fields.insert("status".to_string(), serde_json::json!(status));
            fields.insert("body".to_string(), Value::String(body));
            fields.insert(
                "curl_exit_code".to_string(),
                serde_json::json!(output.status.code()),
            );
            ok_with(fields)
        }
        Err(e) => fail(format!("curl failed to start: {e}")),
    }
}
