pub mod client;

pub use client::RagClient;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AskRequest {
    pub question: String,
}

/// Multipart field name the RAG server reads the document from.
pub const UPLOAD_FIELD: &str = "pdfs";

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("RAG server returned status {status}")]
    Status { status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Serialize for RagError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Pull the answer text out of an `/ask` response body.
///
/// Anything other than a non-empty `answer` string counts as "no answer".
pub fn extract_answer(body: &serde_json::Value) -> Option<String> {
    body.get("answer")
        .and_then(|a| a.as_str())
        .filter(|a| !a.is_empty())
        .map(str::to_string)
}
