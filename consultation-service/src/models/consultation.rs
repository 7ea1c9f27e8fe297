//! Domain types for one consultation exchange.

/// A single inbound consultation: free text plus an optional attachment.
#[derive(Debug, Clone)]
pub struct ConsultationRequest {
    pub prompt: String,

    /// Free-form age attribute; the web client sends "not specified"
    /// when the user leaves it blank.
    pub age: Option<String>,

    pub attachment: Option<Attachment>,
}

/// Raw uploaded file as received at the HTTP boundary.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

/// Outcome of classifying and framing the raw model text.
///
/// `formatted_text` equals `text` unchanged when the exchange is not
/// health-related.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultationResult {
    pub text: String,
    pub is_health_related: bool,
    pub formatted_text: String,
}
