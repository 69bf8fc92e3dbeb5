// SPDX-License-Identifier: MIT

/// Defaults filled into a `THINK` payload before it is forwarded to the
/// worker, plus how to launch the worker itself (§4.11, §6).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Executable name or path, typically `llm_service`.
    pub command: String,
    pub args: Vec<String>,
    pub default_model: String,
    pub default_temperature: f64,
    pub default_max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            command: "llm_service".to_string(),
            args: Vec::new(),
            default_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            default_temperature: 0.7,
            default_max_tokens: 2048,
        }
    }
}
