//! Health-relatedness classification and response framing.
//!
//! The classifier is a fixed keyword heuristic over the original prompt,
//! not the model's reply. False positives and negatives are acceptable;
//! classification never affects what gets persisted.

use crate::models::ConsultationResult;

/// Keywords marking a prompt as health-related (matched case-insensitively).
const HEALTH_KEYWORDS: [&str; 16] = [
    "symptoms",
    "illness",
    "disease",
    "pain",
    "anxiety",
    "depression",
    "medical",
    "health",
    "medication",
    "treatment",
    "diagnosis",
    "doctor",
    "physician",
    "hospital",
    "clinic",
    "therapy",
];

const INSIGHTS_HEADER: &str = "**Consultation Insights:**\n\n";

/// Compliance-relevant literal: must appear verbatim on every
/// health-related response.
const DISCLAIMER: &str = "\n\n**DISCLAIMER: This is AI-generated advice. Medications listed (e.g., Ibuprofen, Sertraline) are examples only and MUST be prescribed and approved by a healthcare professional. Consult your doctor before use.**";

/// Whether the original prompt reads as health-related.
pub fn is_health_related(prompt: &str) -> bool {
    let lowered = prompt.to_lowercase();
    HEALTH_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// Classify the prompt and frame the raw model text accordingly.
///
/// Non-health-related text passes through unchanged; health-related text
/// is wrapped with the insights header and the mandatory disclaimer.
pub fn classify_and_format(raw: &str, original_prompt: &str) -> ConsultationResult {
    let health = is_health_related(original_prompt);
    let formatted_text = if health {
        format!("{}{}{}", INSIGHTS_HEADER, raw, DISCLAIMER)
    } else {
        raw.to_string()
    };

    ConsultationResult {
        text: raw.to_string(),
        is_health_related: health,
        formatted_text,
    }
}
