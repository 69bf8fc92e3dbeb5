// SPDX-License-Identifier: MIT

use clove_core::Value;

use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::request::{ThinkRequest, ThinkResponse};
use crate::worker::{LlmWorker, SubprocessWorker};

/// The single-worker, FIFO-serialized bridge to the LLM subprocess (§4.11).
/// The worker is launched lazily on the first `THINK`; because every call
/// routes through this one gateway, contention across agents is serialized
/// deterministically and no agent can starve another for longer than one
/// in-flight call (§4.11 "fair-scheduling point").
pub struct LlmGateway {
    config: LlmConfig,
    worker: Option<Box<dyn LlmWorker>>,
    factory: Box<dyn FnMut(&LlmConfig) -> Result<Box<dyn LlmWorker>, LlmError> + Send>,
}

impl LlmGateway {
    pub fn new(config: LlmConfig) -> Self {
        Self::with_factory(config, |cfg| {
            SubprocessWorker::spawn(cfg).map(|w| Box::new(w) as Box<dyn LlmWorker>)
        })
    }

    /// Test/embedding seam: supply a worker factory that doesn't launch a
    /// real subprocess.
    pub fn with_factory(
        config: LlmConfig,
        factory: impl FnMut(&LlmConfig) -> Result<Box<dyn LlmWorker>, LlmError> + Send + 'static,
    ) -> Self {
        Self {
            config,
            worker: None,
            factory: Box::new(factory),
        }
    }

    /// `THINK`. Fills in defaults, forwards the request to the worker
    /// (spawning it first if this is the first call or the previous one
    /// died), and returns the parsed response. Worker death during this call
    /// drops the handle so the next `think` respawns it.
    pub fn think(&mut self, request: &ThinkRequest) -> Result<ThinkResponse, LlmError> {
        self.ensure_worker()?;
        let payload: Value = request.to_worker_payload(&self.config);

        #[allow(clippy::expect_used)]
        let worker = self.worker.as_mut().expect("ensured above");
        match worker.send_request(&payload) {
            Ok(raw) => serde_json::from_value(raw).map_err(LlmError::MalformedResponse),
            Err(e) => {
                self.worker = None;
                Err(e)
            }
        }
    }

    fn ensure_worker(&mut self) -> Result<(), LlmError> {
        let needs_spawn = match &mut self.worker {
            None => true,
            Some(w) => !w.is_alive(),
        };
        if needs_spawn {
            self.worker = Some((self.factory)(&self.config)?);
        }
        Ok(())
    }

    pub fn is_worker_running(&mut self) -> bool {
        self.worker.as_mut().is_some_and(|w| w.is_alive())
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
