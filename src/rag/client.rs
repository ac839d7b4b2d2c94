use reqwest::multipart::{Form, Part};
use reqwest::Client;

use super::{extract_answer, AskRequest, RagError, UPLOAD_FIELD};
use crate::config::RagConfig;
use crate::models::{PdfFile, PDF_MIME};

/// HTTP client for the two RAG server endpoints.
#[derive(Debug, Clone)]
pub struct RagClient {
    http: Client,
    base_url: String,
}

impl RagClient {
    pub fn new(config: &RagConfig) -> Result<Self, RagError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            base_url: config.server_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /upload` -- send the document as multipart field `pdfs`.
    /// The response body is not examined.
    pub async fn upload(&self, file: &PdfFile) -> Result<(), RagError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(PDF_MIME)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let resp = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(RagError::Status {
                status: resp.status().as_u16(),
            });
        }
        tracing::debug!(name = %file.name, size = file.size(), "Document accepted by RAG server");
        Ok(())
    }

    /// `POST /ask` -- returns the answer, or `None` when the server replied
    /// without one.
    pub async fn ask(&self, question: &str) -> Result<Option<String>, RagError> {
        let body = AskRequest {
            question: question.to_string(),
        };

        let resp = self
            .http
            .post(format!("{}/ask", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(RagError::Status {
                status: resp.status().as_u16(),
            });
        }

        let text = resp.text().await?;
        let data: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| RagError::Parse(e.to_string()))?;
        Ok(extract_answer(&data))
    }
}
