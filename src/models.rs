use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const PDF_MIME: &str = "application/pdf";
const OCTET_STREAM_MIME: &str = "application/octet-stream";

/// Headers carrying a raw IPC upload's metadata; the body is the file itself.
pub const NAME_HEADER: &str = "x-file-name";
pub const MIME_HEADER: &str = "x-mime-type";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            sender,
            timestamp: Local::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Sender::Bot, content)
    }
}

/// Metadata of the document the RAG server currently holds. File bytes are not kept.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
    pub uploaded_at: DateTime<Local>,
}

/// A file the user picked or dropped, not yet sent anywhere.
#[derive(Clone)]
pub struct PdfFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl PdfFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Build from a raw IPC upload. Header values must be ASCII, so the
    /// webview percent-encodes the name.
    pub fn from_ipc(encoded_name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        let name = urlencoding::decode(encoded_name)
            .map(|name| name.into_owned())
            .unwrap_or_else(|_| encoded_name.to_string());
        Self::new(name, mime_type, bytes)
    }

    /// Read a file from disk. The MIME type comes from the extension, the
    /// same way a browser file input reports it.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self {
            name,
            mime_type: mime_from_path(path).to_string(),
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl std::fmt::Debug for PdfFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "pdf" => PDF_MIME,
        _ => OCTET_STREAM_MIME,
    }
}
