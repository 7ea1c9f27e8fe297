//! Consultation orchestration: one request/response cycle.
//!
//! The per-request progression is validate → build content → invoke →
//! classify → persist, with any step able to fail the cycle except
//! persistence, which is best-effort.

use crate::models::{ConsultationRequest, ConsultationResult, HistoryEntry};
use crate::services::classifier;
use crate::services::content;
use crate::services::history::HistoryStore;
use crate::services::invoker::{InvocationError, ModelInvoker};
use anyhow::anyhow;
use service_core::error::AppError;
use std::time::Instant;
use thiserror::Error;

/// Failure modes of one consultation cycle.
#[derive(Debug, Error)]
pub enum ConsultationError {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

impl From<ConsultationError> for AppError {
    fn from(error: ConsultationError) -> Self {
        match error {
            ConsultationError::EmptyPrompt => {
                AppError::BadRequest(anyhow!("**Input Required for Consultation**"))
            }
            ConsultationError::Invocation(InvocationError::Timeout(_)) => {
                AppError::RequestTimeout("Request timed out. Please try again.".to_string())
            }
            ConsultationError::Invocation(InvocationError::EmptyResponse) => {
                AppError::ServiceFailure {
                    message: "Empty response received".to_string(),
                    details: None,
                }
            }
            ConsultationError::Invocation(InvocationError::RateLimited) => {
                AppError::TooManyRequests {
                    message: "**Consultation Overload**".to_string(),
                    details: Some("Too many requests. Please try again later.".to_string()),
                }
            }
            ConsultationError::Invocation(InvocationError::QuotaExhausted) => {
                AppError::ServiceFailure {
                    message: "**Service Quota Exceeded**".to_string(),
                    details: Some(
                        "The service is temporarily unavailable due to high demand.".to_string(),
                    ),
                }
            }
            ConsultationError::Invocation(InvocationError::Unavailable(_)) => AppError::NotFound {
                message: "**Service Temporarily Unavailable**".to_string(),
                details: Some("Unable to process consultation request".to_string()),
            },
            ConsultationError::Invocation(InvocationError::Backend(_)) => AppError::ServiceFailure {
                message: "**Consultation Processing Error**".to_string(),
                details: Some("Unable to generate insights. Please try again.".to_string()),
            },
        }
    }
}

/// Runs the request pipeline and triggers history persistence as a side
/// effect. Persistence failures never change the terminal outcome: the
/// result has already been produced and returning it takes priority.
#[derive(Clone)]
pub struct ConsultationOrchestrator {
    invoker: ModelInvoker,
    history: HistoryStore,
}

impl ConsultationOrchestrator {
    pub fn new(invoker: ModelInvoker, history: HistoryStore) -> Self {
        Self { invoker, history }
    }

    pub async fn handle(
        &self,
        request: ConsultationRequest,
    ) -> Result<ConsultationResult, ConsultationError> {
        let start = Instant::now();

        let prompt = request.prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(ConsultationError::EmptyPrompt);
        }
        tracing::debug!(
            stage = "validated",
            prompt_len = prompt.len(),
            has_attachment = request.attachment.is_some(),
            "consultation validated"
        );

        metrics::counter!("consultations_total").increment(1);

        let parts = content::build_parts(&request);
        tracing::debug!(
            stage = "content_built",
            part_count = parts.len(),
            "content parts assembled"
        );

        let text = match self.invoker.invoke(&parts).await {
            Ok(text) => text,
            Err(error) => {
                metrics::counter!("consultations_failed", "kind" => error_kind(&error))
                    .increment(1);
                tracing::error!(stage = "invoked", %error, "model invocation failed");
                return Err(error.into());
            }
        };
        tracing::debug!(
            stage = "invoked",
            response_len = text.len(),
            "model invocation succeeded"
        );

        let result = classifier::classify_and_format(&text, &prompt);
        tracing::debug!(
            stage = "classified",
            is_health_related = result.is_health_related,
            "response classified"
        );

        // Best effort: the raw (unformatted) response is what gets saved.
        let entry = HistoryEntry::new(prompt, result.text.clone(), request.age.clone());
        if let Err(error) = self.history.append(entry).await {
            tracing::error!(stage = "persisted", %error, "failed to append history entry");
        } else {
            tracing::debug!(stage = "persisted", "history entry appended");
        }

        metrics::histogram!("consultation_duration_seconds").record(start.elapsed().as_secs_f64());
        tracing::info!(
            stage = "completed",
            duration_ms = start.elapsed().as_millis() as u64,
            "consultation completed"
        );

        Ok(result)
    }
}

fn error_kind(error: &InvocationError) -> &'static str {
    match error {
        InvocationError::Timeout(_) => "timeout",
        InvocationError::EmptyResponse => "empty_response",
        InvocationError::RateLimited => "rate_limited",
        InvocationError::QuotaExhausted => "quota_exhausted",
        InvocationError::Unavailable(_) => "unavailable",
        InvocationError::Backend(_) => "backend",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    async fn orchestrator(reply: &str, history_path: &str) -> ConsultationOrchestrator {
        let provider = Arc::new(MockTextProvider::new(
            Some(reply.to_string()),
            Duration::ZERO,
        ));
        let invoker = ModelInvoker::new(provider, Duration::from_secs(25));
        let history = HistoryStore::new(history_path.to_string()).await.unwrap();
        ConsultationOrchestrator::new(invoker, history)
    }

    fn temp_log_path() -> String {
        format!("target/test-orchestrator-{}.json", Uuid::new_v4())
    }

    #[tokio::test]
    async fn empty_prompt_fails_before_invocation_or_persistence() {
        let path = temp_log_path();
        let orchestrator = orchestrator("unused", &path).await;

        let result = orchestrator
            .handle(ConsultationRequest {
                prompt: "   \n".to_string(),
                age: None,
                attachment: None,
            })
            .await;

        assert!(matches!(result, Err(ConsultationError::EmptyPrompt)));
        let entries = orchestrator.history.read_all().await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn successful_cycle_persists_the_raw_exchange() {
        let path = temp_log_path();
        let orchestrator = orchestrator("Take rest and hydrate.", &path).await;

        let result = orchestrator
            .handle(ConsultationRequest {
                prompt: "I have a headache".to_string(),
                age: Some("30".to_string()),
                attachment: None,
            })
            .await
            .expect("consultation failed");

        // No keyword hit for this exact sentence: passthrough.
        assert!(!result.is_health_related);
        assert_eq!(result.formatted_text, "Take rest and hydrate.");

        let entries = orchestrator.history.read_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].prompt, "I have a headache");
        assert_eq!(entries[0].response, "Take rest and hydrate.");
        assert_eq!(entries[0].age.as_deref(), Some("30"));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[test]
    fn invocation_errors_map_to_the_user_facing_table() {
        let cases: Vec<(InvocationError, _)> = vec![
            (
                InvocationError::Timeout(Duration::from_secs(25)),
                "Request timed out. Please try again.",
            ),
            (InvocationError::EmptyResponse, "Empty response received"),
            (InvocationError::RateLimited, "**Consultation Overload**"),
            (InvocationError::QuotaExhausted, "**Service Quota Exceeded**"),
            (
                InvocationError::Unavailable("503".to_string()),
                "**Service Temporarily Unavailable**",
            ),
            (
                InvocationError::Backend("boom".to_string()),
                "**Consultation Processing Error**",
            ),
        ];

        for (error, expected) in cases {
            let app_error = AppError::from(ConsultationError::Invocation(error));
            let message = match &app_error {
                AppError::RequestTimeout(message) => message.clone(),
                AppError::TooManyRequests { message, .. } => message.clone(),
                AppError::NotFound { message, .. } => message.clone(),
                AppError::ServiceFailure { message, .. } => message.clone(),
                other => panic!("unexpected mapping: {:?}", other),
            };
            assert_eq!(message, expected);
        }

        let empty = AppError::from(ConsultationError::EmptyPrompt);
        assert!(matches!(empty, AppError::BadRequest(ref e)
            if e.to_string() == "**Input Required for Consultation**"));
    }

    #[tokio::test]
    async fn corrupt_attachment_degrades_to_text_only_and_completes() {
        let path = temp_log_path();
        let orchestrator = orchestrator("Looks fine to me.", &path).await;

        let result = orchestrator
            .handle(ConsultationRequest {
                prompt: "check this file".to_string(),
                age: None,
                attachment: Some(crate::models::Attachment {
                    data: vec![0xff, 0xfe],
                    mime_type: "text/plain".to_string(),
                    file_name: "broken.txt".to_string(),
                }),
            })
            .await
            .expect("degraded consultation should still complete");

        assert_eq!(result.text, "Looks fine to me.");

        let _ = tokio::fs::remove_file(&path).await;
    }
}
