//! Durable append-only history log.
//!
//! The log is one JSON array rewritten in full on every append. Appends
//! are serialized behind a mutex and committed via a temp file + rename,
//! so concurrent requests cannot lose entries and readers never observe
//! a torn document.

use crate::models::HistoryEntry;
use anyhow::anyhow;
use service_core::error::AppError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct HistoryStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl HistoryStore {
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, rewriting the whole log.
    ///
    /// A corrupt existing log is restarted rather than poisoning every
    /// subsequent append; corruption stays a reportable error on the
    /// read path.
    pub async fn append(&self, entry: HistoryEntry) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = match self.load().await {
            Ok(entries) => entries,
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "history log unreadable, starting a new log"
                );
                Vec::new()
            }
        };
        entries.push(entry);

        let json = serde_json::to_vec_pretty(&entries)
            .map_err(|e| AppError::InternalError(anyhow!("Failed to serialize history: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;

        Ok(())
    }

    /// Read the full log in append order. A missing file is an empty
    /// history, not an error.
    pub async fn read_all(&self) -> Result<Vec<HistoryEntry>, AppError> {
        self.load().await
    }

    async fn load(&self) -> Result<Vec<HistoryEntry>, AppError> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::from(e)),
        };

        serde_json::from_slice(&data).map_err(|e| AppError::ServiceFailure {
            message: "Failed to retrieve chat history".to_string(),
            details: Some(e.to_string()),
        })
    }
}
