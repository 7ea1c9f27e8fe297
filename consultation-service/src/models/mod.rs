pub mod consultation;
pub mod history;

pub use consultation::{Attachment, ConsultationRequest, ConsultationResult};
pub use history::HistoryEntry;
