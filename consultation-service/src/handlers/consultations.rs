use crate::dtos::{ConsultationResponse, HistoryResponse};
use crate::models::{Attachment, ConsultationRequest};
use crate::startup::AppState;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

/// `POST /consultations`: multipart fields `userPrompt` (required),
/// `age` (optional free-form text), `file` (optional single attachment).
pub async fn submit_consultation(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut prompt = String::new();
    let mut age: Option<String> = None;
    let mut attachment: Option<Attachment> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        match field.name() {
            Some("userPrompt") => {
                prompt = field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read userPrompt: {}", e))
                })?;
            }
            Some("age") => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read age: {}", e))
                })?;
                if !value.is_empty() {
                    age = Some(value);
                }
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("unnamed").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e))
                    })?
                    .to_vec();

                attachment = Some(Attachment {
                    data,
                    mime_type,
                    file_name,
                });
            }
            _ => {}
        }
    }

    let request_id = Uuid::new_v4().to_string();
    tracing::info!(
        request_id = %request_id,
        prompt_len = prompt.len(),
        has_attachment = attachment.is_some(),
        "Consultation received"
    );

    let request = ConsultationRequest {
        prompt,
        age,
        attachment,
    };
    let result = state
        .orchestrator
        .handle(request)
        .await
        .map_err(AppError::from)?;

    tracing::info!(
        request_id = %request_id,
        is_health_related = result.is_health_related,
        "Consultation completed"
    );

    Ok(Json(ConsultationResponse::success(result.formatted_text)))
}

/// `GET /consultations/history`: the full log, oldest first. An absent
/// log is an empty history, never an error.
pub async fn read_history(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let history = state.history.read_all().await?;
    Ok(Json(HistoryResponse { history }))
}
