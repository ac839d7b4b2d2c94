use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RagConfig {
    /// Base URL of the RAG server, without a trailing slash.
    pub server_url: String,
    pub request_timeout: Duration,
}

impl RagConfig {
    pub fn new(server_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            server_url: normalize_url(server_url)?,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load from the process environment, honouring a `.env` file in the
    /// working directory.
    pub fn from_env() -> Result<Self, AppError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let server_url = lookup("RAG_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let timeout_secs = match lookup("RAG_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("RAG_REQUEST_TIMEOUT_SECS must be a number, got {raw:?}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self::new(&server_url)?.with_timeout(Duration::from_secs(timeout_secs)))
    }
}

fn normalize_url(raw: &str) -> Result<String, AppError> {
    let url = raw.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(AppError::Config(format!(
            "RAG server URL must start with http:// or https://, got {raw:?}"
        )));
    }
    Ok(url.to_string())
}
