use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Wall-clock budget for one model invocation, in seconds.
const DEFAULT_DEADLINE_SECS: u64 = 25;

#[derive(Debug, Clone)]
pub struct ConsultationConfig {
    pub common: core_config::Config,
    pub provider: ProviderConfig,
    pub google: GoogleConfig,
    pub history: HistoryConfig,
    pub invocation: InvocationConfig,
    pub mock: MockConfig,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Which text provider to build: "gemini" or "mock".
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Path of the JSON history log document.
    pub file_path: String,
}

#[derive(Debug, Clone)]
pub struct InvocationConfig {
    pub deadline_secs: u64,
}

impl InvocationConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

/// Tuning knobs for the mock provider, used by tests and local runs.
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub reply: Option<String>,
    pub delay_ms: u64,
}

impl ConsultationConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(ConsultationConfig {
            common,
            provider: ProviderConfig {
                name: get_env("CONSULT_PROVIDER", Some("gemini"), is_prod)?,
            },
            google: GoogleConfig {
                api_key: get_env("GOOGLE_API_KEY", None, is_prod)?,
                model: get_env("CONSULT_TEXT_MODEL", Some("gemini-1.5-pro"), is_prod)?,
            },
            history: HistoryConfig {
                file_path: get_env("CONSULT_HISTORY_FILE", Some("chat_history.json"), is_prod)?,
            },
            invocation: InvocationConfig {
                deadline_secs: get_env(
                    "CONSULT_DEADLINE_SECS",
                    Some(&DEFAULT_DEADLINE_SECS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_DEADLINE_SECS),
            },
            mock: MockConfig {
                reply: env::var("CONSULT_MOCK_REPLY").ok(),
                delay_ms: get_env("CONSULT_MOCK_DELAY_MS", Some("0"), is_prod)?
                    .parse()
                    .unwrap_or(0),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
