// SPDX-License-Identifier: MIT

use clove_core::Value;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// A `THINK` payload, with `model`/`temperature`/`max_tokens` defaults
/// filled in from [`LlmConfig`] before being forwarded to the worker
/// verbatim (§4.11).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinkRequest {
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Anything else the caller included; forwarded untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ThinkRequest {
    /// Build the exact JSON object written to the worker's stdin, with
    /// defaults from `config` filled in only where the caller left a field
    /// unset.
    pub fn to_worker_payload(&self, config: &LlmConfig) -> Value {
        let mut obj = self.extra.clone();
        obj.insert("prompt".to_string(), Value::String(self.prompt.clone()));
        obj.insert(
            "model".to_string(),
            Value::String(self.model.clone().unwrap_or_else(|| config.default_model.clone())),
        );
        obj.insert(
            "temperature".to_string(),
            serde_json::json!(self.temperature.unwrap_or(config.default_temperature)),
        );
        obj.insert(
            "max_tokens".to_string(),
            serde_json::json!(self.max_tokens.unwrap_or(config.default_max_tokens)),
        );
        Value::Object(obj)
    }
}

/// Required response shape from the worker (§4.11, §6): `{"success": bool,
/// "content": string?, "tokens": int?, "error": string?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinkResponse {
    pub success: bool,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tokens: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}
