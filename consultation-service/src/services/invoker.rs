//! Deadline-bounded invocation of the configured text provider.

use crate::services::providers::{ContentPart, ProviderError, TextProvider};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Failure modes of one model invocation, as seen by the orchestrator.
///
/// A closed set: the provider's native error shape never leaks past this
/// boundary.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("invocation exceeded the {0:?} deadline")]
    Timeout(Duration),

    #[error("backend returned an empty response")]
    EmptyResponse,

    #[error("backend rate limited the request")]
    RateLimited,

    #[error("backend quota exhausted")]
    QuotaExhausted,

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend failure: {0}")]
    Backend(String),
}

impl From<ProviderError> for InvocationError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::RateLimited => InvocationError::RateLimited,
            ProviderError::QuotaExhausted => InvocationError::QuotaExhausted,
            ProviderError::NotFound(msg) => InvocationError::Unavailable(msg),
            ProviderError::NetworkError(msg) => InvocationError::Unavailable(msg),
            other => InvocationError::Backend(other.to_string()),
        }
    }
}

/// Issues one request to the provider under a hard wall-clock deadline.
///
/// The deadline is enforced with [`tokio::time::timeout`]; on expiry the
/// in-flight call is dropped, which aborts the outbound request, never a
/// silent partial result. A success carrying no usable text is an error,
/// not a zero-length answer. Failed invocations are never retried here.
#[derive(Clone)]
pub struct ModelInvoker {
    provider: Arc<dyn TextProvider>,
    deadline: Duration,
}

impl ModelInvoker {
    pub fn new(provider: Arc<dyn TextProvider>, deadline: Duration) -> Self {
        Self { provider, deadline }
    }

    pub async fn invoke(&self, parts: &[ContentPart]) -> Result<String, InvocationError> {
        let response = tokio::time::timeout(self.deadline, self.provider.generate(parts))
            .await
            .map_err(|_| InvocationError::Timeout(self.deadline))??;

        tracing::debug!(
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "model invocation usage"
        );

        match response.text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(InvocationError::EmptyResponse),
        }
    }
}
