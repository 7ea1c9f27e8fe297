//! History log entry model.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One prompt/response exchange in the durable history log.
///
/// Entries are append-only and never mutated; the on-disk log is a single
/// JSON array in append order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The user's prompt, as consulted.
    pub prompt: String,

    /// The raw model response (unformatted, regardless of classification).
    pub response: String,

    /// Age attribute submitted with the request, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,

    /// RFC 3339 timestamp recorded at append time.
    pub timestamp: String,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn new(prompt: String, response: String, age: Option<String>) -> Self {
        Self {
            prompt,
            response,
            age,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
