//! Multimodal content assembly.
//!
//! Pure functions turning a validated consultation request into the
//! ordered content parts sent to the provider. No network or storage I/O
//! happens here.

use crate::models::{Attachment, ConsultationRequest};
use crate::services::providers::ContentPart;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Sentinel the web client submits when no age was entered.
pub const AGE_NOT_SPECIFIED: &str = "not specified";

/// Assemble the ordered content parts for one consultation request.
///
/// The instruction part always comes first. A `text/*` attachment is
/// inlined as a labeled second text part; any other attachment is carried
/// as base64 inline data. An attachment that cannot be decoded is dropped
/// with a warning; a malformed upload must never block an otherwise
/// valid consultation.
pub fn build_parts(request: &ConsultationRequest) -> Vec<ContentPart> {
    let mut parts = vec![ContentPart::Text {
        text: consultation_prompt(request.prompt.trim(), request.age.as_deref()),
    }];

    if let Some(attachment) = &request.attachment {
        match attachment_part(attachment) {
            Ok(part) => parts.push(part),
            Err(error) => {
                tracing::warn!(
                    file_name = %attachment.file_name,
                    mime_type = %attachment.mime_type,
                    %error,
                    "dropping undecodable attachment"
                );
            }
        }
    }

    parts
}

fn attachment_part(attachment: &Attachment) -> Result<ContentPart, std::string::FromUtf8Error> {
    if attachment.mime_type.starts_with("text/") {
        let text = String::from_utf8(attachment.data.clone())?;
        Ok(ContentPart::Text {
            text: format!(
                "User uploaded file: {}\n\nFile content:\n{}",
                attachment.file_name, text
            ),
        })
    } else {
        Ok(ContentPart::InlineData {
            mime_type: attachment.mime_type.clone(),
            data: BASE64.encode(&attachment.data),
        })
    }
}

/// The fixed consultation-protocol instruction, interpolated with the
/// prompt and age attribute. The wording follows the product's protocol
/// text; only the interpolation positions matter for correctness.
fn consultation_prompt(prompt: &str, age: Option<&str>) -> String {
    let age_value = age.unwrap_or(AGE_NOT_SPECIFIED);
    let age_guidance = match age {
        Some(a) if a != AGE_NOT_SPECIFIED => format!(
            "User age: {}. Tailor medication suggestions accordingly (e.g., pediatric doses or adult formulations).",
            a
        ),
        _ => "Age not provided; use general adult recommendations.".to_string(),
    };

    format!(
        "**Professional Consultation Protocol:**\n\
         • Provide concise, actionable insights in clear, bulleted format\n\
         • For mental health: Include symptoms, causes, coping strategies, and specific medication names (e.g., Sertraline for depression)\n\
         • For physical health: Suggest specific, widely available medication names (e.g., Ibuprofen for pain) tailored to the condition and age (if provided: {age_value})\n\
         • Use bold text for critical information (e.g., **DO THIS NOW**)\n\
         \n\
         **Response Format Requirements:**\n\
         1. **Key Symptoms**: List observable signs\n\
         2. **Potential Causes**: Identify likely triggers or conditions\n\
         3. **Immediate Coping Strategies**: Practical steps to manage the issue now\n\
         4. **Recommended Interventions**: Specific medication names and product names (e.g., Acetaminophen, Fluoxetine) with age-adjusted notes if applicable, plus therapies\n\
         5. **Suggested Consultation/Referral**: Next steps with professionals\n\
         \n\
         **Detailed Analysis Prompt:**\n\
         Analyze the following health/mental health concern with maximum precision:\n\
         \"{prompt}\"\n\
         {age_guidance}\n\
         \n\
         **Additional Guidelines:**\n\
         - Be direct, evidence-based, and solution-focused\n\
         - Provide specific product/medicine names relevant to the condition (e.g., \"Paracetamol\" for fever, \"Lorazepam\" for anxiety)\n\
         - Emphasize that medications require a doctor's prescription and approval\n\
         - Prioritize user's immediate well-being\n\
         \n\
         If the user's question is not health-related, still provide a helpful and informative response but without the medical format."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str, age: Option<&str>, attachment: Option<Attachment>) -> ConsultationRequest {
        ConsultationRequest {
            prompt: prompt.to_string(),
            age: age.map(str::to_string),
            attachment,
        }
    }

    #[test]
    fn instruction_part_comes_first_and_carries_the_prompt() {
        let parts = build_parts(&request("I have a headache", None, None));

        assert_eq!(parts.len(), 1);
        match &parts[0] {
            ContentPart::Text { text } => {
                assert!(text.contains("\"I have a headache\""));
                assert!(text.contains("Age not provided; use general adult recommendations."));
            }
            other => panic!("expected text part, got {:?}", other),
        }
    }

    #[test]
    fn age_attribute_is_interpolated_when_meaningful() {
        let parts = build_parts(&request("fever", Some("8"), None));

        match &parts[0] {
            ContentPart::Text { text } => {
                assert!(text.contains("if provided: 8"));
                assert!(text.contains("User age: 8."));
            }
            other => panic!("expected text part, got {:?}", other),
        }
    }

    #[test]
    fn sentinel_age_falls_back_to_general_recommendations() {
        let parts = build_parts(&request("fever", Some(AGE_NOT_SPECIFIED), None));

        match &parts[0] {
            ContentPart::Text { text } => {
                assert!(text.contains("Age not provided; use general adult recommendations."));
            }
            other => panic!("expected text part, got {:?}", other),
        }
    }

    #[test]
    fn text_attachment_is_appended_as_labeled_text() {
        let attachment = Attachment {
            data: b"blood pressure readings".to_vec(),
            mime_type: "text/plain".to_string(),
            file_name: "readings.txt".to_string(),
        };
        let parts = build_parts(&request("review this", None, Some(attachment)));

        assert_eq!(parts.len(), 2);
        match &parts[1] {
            ContentPart::Text { text } => {
                assert!(text.starts_with("User uploaded file: readings.txt"));
                assert!(text.ends_with("blood pressure readings"));
            }
            other => panic!("expected text part, got {:?}", other),
        }
    }

    #[test]
    fn binary_attachment_is_appended_as_inline_data() {
        let attachment = Attachment {
            data: vec![0xde, 0xad, 0xbe, 0xef],
            mime_type: "image/png".to_string(),
            file_name: "scan.png".to_string(),
        };
        let parts = build_parts(&request("what is this", None, Some(attachment)));

        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[1],
            ContentPart::InlineData {
                mime_type: "image/png".to_string(),
                data: BASE64.encode([0xde, 0xad, 0xbe, 0xef]),
            }
        );
    }

    #[test]
    fn undecodable_text_attachment_is_dropped() {
        let attachment = Attachment {
            data: vec![0xff, 0xfe, 0xfd],
            mime_type: "text/plain".to_string(),
            file_name: "garbage.txt".to_string(),
        };
        let parts = build_parts(&request("still answer me", None, Some(attachment)));

        assert_eq!(parts.len(), 1);
    }
}
