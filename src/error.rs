use serde::Serialize;

use crate::rag::RagError;
use crate::validation::ValidationError;

/// Alert text shown when the RAG server does not accept an upload.
pub const UPLOAD_FAILED_TEXT: &str = "Failed to upload PDF. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", UPLOAD_FAILED_TEXT)]
    UploadFailed(#[source] RagError),

    #[error("Upload a PDF before asking questions.")]
    NoDocument,

    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("Busy: {0}")]
    Busy(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(&'static str),

    #[error("RAG server error: {0}")]
    Rag(#[from] RagError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::UploadFailed(_) => "upload_failed",
            AppError::NoDocument => "no_document",
            AppError::EmptyQuestion => "empty_question",
            AppError::Busy(_) => "busy",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Rag(_) => "rag",
            AppError::Io(_) => "io",
            AppError::Config(_) => "config",
        }
    }
}

/// Tauri requires `Serialize` on command errors; the webview gets `{ error, kind }`.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("error", &self.to_string())?;
        s.serialize_field("kind", self.kind())?;
        s.end()
    }
}
