//! Generative-language provider abstractions and implementations.
//!
//! This module provides a trait-based abstraction for text providers,
//! allowing easy swapping between backends (Gemini, mock).

pub mod gemini;
pub mod mock;

use crate::config::ConsultationConfig;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Quota exhausted")]
    QuotaExhausted,

    #[error("Model endpoint not found: {0}")]
    NotFound(String),

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// One element of an ordered multimodal request.
///
/// The content builder emits these; each provider translates them to its
/// own wire shape. The closed variant set keeps the builder's output
/// exhaustively matchable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text {
        text: String,
    },
    /// Base64-encoded binary payload with its declared MIME type.
    InlineData {
        mime_type: String,
        data: String,
    },
}

/// Result of a provider call.
pub struct ProviderResponse {
    /// Generated text, when the backend produced any.
    pub text: Option<String>,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,

    /// Finish reason.
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Issue one request carrying the ordered content parts.
    async fn generate(&self, parts: &[ContentPart]) -> Result<ProviderResponse, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}

/// Build the provider selected by configuration.
pub fn build(config: &ConsultationConfig) -> Result<Arc<dyn TextProvider>, ProviderError> {
    match config.provider.name.as_str() {
        "gemini" => Ok(Arc::new(gemini::GeminiTextProvider::new(
            gemini::GeminiConfig {
                api_key: config.google.api_key.clone(),
                model: config.google.model.clone(),
            },
        ))),
        "mock" => Ok(Arc::new(mock::MockTextProvider::new(
            config.mock.reply.clone(),
            Duration::from_millis(config.mock.delay_ms),
        ))),
        other => Err(ProviderError::NotConfigured(format!(
            "unknown provider: {}",
            other
        ))),
    }
}
