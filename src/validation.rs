use crate::models::{PdfFile, PDF_MIME};

/// Largest document the client will send, 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please upload a PDF file only.")]
    NotPdf { mime_type: String },
    #[error("File size should be less than 50MB.")]
    TooLarge { size: u64 },
}

/// Client-side checks run before any network call.
pub fn validate_pdf(file: &PdfFile) -> Result<(), ValidationError> {
    validate_declared(&file.mime_type, file.size())
}

/// The same checks on what a file claims to be, so a picker or drop can be
/// refused before its bytes are read.
pub fn validate_declared(mime_type: &str, size: u64) -> Result<(), ValidationError> {
    if mime_type != PDF_MIME {
        return Err(ValidationError::NotPdf {
            mime_type: mime_type.to_string(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge { size });
    }
    Ok(())
}

pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}
