//! LLM router — tries registered backends in priority order, retrying each
//! one with exponential backoff before moving on to the next.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::{LlmBackend, LlmError, LlmRequest, LlmResponse};

/// Retry behaviour applied to every backend in the chain.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts per backend, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each failure.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self { max_attempts: 1, initial_backoff: Duration::ZERO }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Ordered fallback over named backends. The first registered backend is the
/// primary; its model id is what the router reports.
pub struct LlmRouter {
    backends: Vec<(String, Arc<dyn LlmBackend>)>,
    retry: RetryPolicy,
}

impl LlmRouter {
    pub fn new(retry: RetryPolicy) -> Self {
        Self { backends: Vec::new(), retry }
    }

    pub fn register_backend(&mut self, name: impl Into<String>, backend: Arc<dyn LlmBackend>) {
        self.backends.push((name.into(), backend));
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Send `req` to the first backend that answers.
    pub async fn route(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let mut last_error = None;

        for (name, backend) in &self.backends {
            match self.try_backend(name, backend.as_ref(), &req).await {
                Ok(resp) => {
                    tracing::info!(
                        backend = %name,
                        model = %resp.model,
                        is_local = backend.is_local(),
                        completion_tokens = resp.completion_tokens,
                        "LLM request served"
                    );
                    return Ok(resp);
                }
                Err(e) => {
                    tracing::warn!(backend = %name, error = %e, "LLM backend exhausted, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Unavailable("no LLM backend configured".to_string())))
    }

    async fn try_backend(
        &self,
        name: &str,
        backend: &dyn LlmBackend,
        req: &LlmRequest,
    ) -> Result<LlmResponse, LlmError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match backend.complete(req.clone()).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < attempts && is_retryable(&e) => {
                    let delay = self.retry.backoff(attempt);
                    tracing::debug!(backend = name, attempt, ?delay, error = %e, "retrying LLM request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Client-side API errors (bad key, bad request) won't improve on retry.
fn is_retryable(error: &LlmError) -> bool {
    match error {
        LlmError::ApiError { status, .. } => *status >= 500,
        LlmError::Serde(_)                => false,
        _                                 => true,
    }
}

#[async_trait]
impl LlmBackend for LlmRouter {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.route(req).await
    }

    fn model_id(&self) -> &str {
        self.backends
            .first()
            .map(|(_, b)| b.model_id())
            .unwrap_or("none")
    }

    fn is_local(&self) -> bool {
        self.backends.iter().all(|(_, b)| b.is_local())
    }
}
