//! Mock provider implementation for testing.

use super::{ContentPart, FinishReason, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::time::Duration;

/// Mock text provider for tests and local development.
///
/// Returns a canned reply (or an echo of the request shape) after an
/// optional artificial delay, which deadline tests use to outlast the
/// invocation budget.
pub struct MockTextProvider {
    reply: Option<String>,
    delay: Duration,
}

impl MockTextProvider {
    pub fn new(reply: Option<String>, delay: Duration) -> Self {
        Self { reply, delay }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, parts: &[ContentPart]) -> Result<ProviderResponse, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let text = self
            .reply
            .clone()
            .unwrap_or_else(|| format!("Mock response for {} part(s)", parts.len()));

        let input_len: usize = parts
            .iter()
            .map(|part| match part {
                ContentPart::Text { text } => text.len(),
                ContentPart::InlineData { data, .. } => data.len(),
            })
            .sum();

        Ok(ProviderResponse {
            text: Some(text),
            input_tokens: input_len as i32 / 4,
            output_tokens: 10,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
