use crate::models::HistoryEntry;
use serde::Serialize;

/// Body returned on a successful consultation.
#[derive(Debug, Serialize)]
pub struct ConsultationResponse {
    pub text: String,
    pub status: &'static str,
}

impl ConsultationResponse {
    pub fn success(text: String) -> Self {
        Self {
            text,
            status: "success",
        }
    }
}

/// Body returned by the history read endpoint.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}
