use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::RagConfig;
use crate::error::AppError;
use crate::models::PdfFile;
use crate::rag::RagClient;
use crate::session::{ChatSession, SessionView};

/// Shared state behind every front-end: the session plus the RAG client.
///
/// The session lock is only held for state transitions, never across a
/// request, so the view stays readable while the server is working.
pub struct AppState {
    session: Mutex<ChatSession>,
    client: RagClient,
}

impl AppState {
    pub fn new(client: RagClient) -> Self {
        Self {
            session: Mutex::new(ChatSession::new()),
            client,
        }
    }

    pub fn from_config(config: &RagConfig) -> Result<Self, AppError> {
        Ok(Self::new(RagClient::new(config)?))
    }

    fn session(&self) -> MutexGuard<'_, ChatSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn server_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn view(&self) -> SessionView {
        self.session().view()
    }

    pub fn set_drag_over(&self, active: bool) -> SessionView {
        let mut session = self.session();
        session.set_drag_over(active);
        session.view()
    }

    pub fn remove_file(&self) -> SessionView {
        let mut session = self.session();
        session.remove_file();
        session.view()
    }

    /// Validate, upload and, on success, start a fresh conversation.
    ///
    /// `on_change` sees the view after the session enters the uploading
    /// state, before the request goes out.
    pub async fn upload(
        &self,
        file: PdfFile,
        on_change: impl Fn(SessionView) + Send,
    ) -> Result<SessionView, AppError> {
        let (ticket, view) = {
            let mut session = self.session();
            let ticket = session.begin_upload(&file)?;
            (ticket, session.view())
        };
        on_change(view);

        tracing::info!(name = %file.name, size = file.size(), "Uploading document");
        let outcome = self.client.upload(&file).await;

        let mut session = self.session();
        session.finish_upload(ticket, outcome)?;
        Ok(session.view())
    }

    pub async fn upload_path(
        &self,
        path: &Path,
        on_change: impl Fn(SessionView) + Send,
    ) -> Result<SessionView, AppError> {
        let file = PdfFile::from_path(path).await?;
        self.upload(file, on_change).await
    }

    /// Post the user's question and append the reply.
    ///
    /// Request failures are not errors here: they end up in the log as the
    /// apology message. Errors are only returned for submissions the session
    /// refuses (blank input, no document, question already pending).
    pub async fn ask(
        &self,
        input: &str,
        on_change: impl Fn(SessionView) + Send,
    ) -> Result<SessionView, AppError> {
        let (ticket, view) = {
            let mut session = self.session();
            let ticket = session.begin_ask(input)?;
            (ticket, session.view())
        };
        on_change(view);

        tracing::debug!(question = %ticket.question(), "Asking RAG server");
        let outcome = self.client.ask(ticket.question()).await;

        let mut session = self.session();
        session.finish_ask(ticket, outcome);
        Ok(session.view())
    }
}
