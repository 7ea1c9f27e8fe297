pub mod consultations;

pub use consultations::{ConsultationResponse, HistoryResponse};
