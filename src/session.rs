//! Chat session state: which screen is showing, the uploaded document and
//! the message log.
//!
//! The screen is one enum rather than independent `uploading` / `loading` /
//! `drag_over` flags, so states like "uploading while a question is pending"
//! cannot be represented. Every network round trip is split into a `begin_*`
//! call, which validates and moves into the in-flight state, and a
//! `finish_*` call, which applies the outcome. Callers do the I/O in between
//! without holding any lock.

use chrono::Local;
use serde::Serialize;

use crate::error::AppError;
use crate::format::{format_file_size, format_time};
use crate::models::{Message, PdfFile, Sender, UploadedFile};
use crate::rag::RagError;
use crate::validation::{is_blank, validate_pdf};

pub const NO_ANSWER_TEXT: &str = "Sorry, I could not process your question.";
pub const ASK_ERROR_TEXT: &str =
    "Sorry, there was an error processing your message. Please try again.";

pub fn welcome_text(file_name: &str) -> String {
    format!(
        "PDF \"{file_name}\" has been uploaded successfully! You can now ask questions about its content."
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Drop zone visible.
    NoFile { drag_over: bool },
    /// Spinner; drop zone inert. `previous` is restored if the upload fails.
    Uploading {
        file_name: String,
        previous: Option<UploadedFile>,
    },
    /// Chat panel. `loading` while a question is in flight.
    FilePresent { file: UploadedFile, loading: bool },
}

impl Default for Screen {
    fn default() -> Self {
        Screen::NoFile { drag_over: false }
    }
}

/// Handed out by [`ChatSession::begin_upload`], consumed by `finish_upload`.
#[derive(Debug)]
pub struct UploadTicket {
    name: String,
    size: u64,
}

/// Handed out by [`ChatSession::begin_ask`], consumed by `finish_ask`.
#[derive(Debug)]
pub struct AskTicket {
    question: String,
    document: u64,
}

impl AskTicket {
    pub fn question(&self) -> &str {
        &self.question
    }
}

#[derive(Debug, Default)]
pub struct ChatSession {
    screen: Screen,
    messages: Vec<Message>,
    // Bumped whenever the document changes so late answers can be told apart.
    document: u64,
    // Bumped on every transition; lets a front-end discard out-of-order views.
    revision: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn uploaded_file(&self) -> Option<&UploadedFile> {
        match &self.screen {
            Screen::FilePresent { file, .. } => Some(file),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.screen, Screen::FilePresent { loading: true, .. })
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.screen, Screen::Uploading { .. })
    }

    /// Whether the chat input accepts a submission right now.
    pub fn can_chat(&self) -> bool {
        matches!(self.screen, Screen::FilePresent { loading: false, .. })
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Drag hover only matters while the drop zone is showing. Returns
    /// whether anything changed.
    pub fn set_drag_over(&mut self, active: bool) -> bool {
        let changed = match &mut self.screen {
            Screen::NoFile { drag_over } if *drag_over != active => {
                *drag_over = active;
                true
            }
            _ => false,
        };
        if changed {
            self.touch();
        }
        changed
    }

    pub fn begin_upload(&mut self, file: &PdfFile) -> Result<UploadTicket, AppError> {
        validate_pdf(file)?;

        let previous = match &self.screen {
            Screen::NoFile { .. } => None,
            Screen::FilePresent { loading: false, file } => Some(file.clone()),
            Screen::FilePresent { loading: true, .. } => {
                return Err(AppError::Busy("a question is still being answered"))
            }
            Screen::Uploading { .. } => {
                return Err(AppError::Busy("an upload is already in progress"))
            }
        };

        tracing::debug!(name = %file.name, size = file.size(), "Upload started");
        self.screen = Screen::Uploading {
            file_name: file.name.clone(),
            previous,
        };
        self.touch();
        Ok(UploadTicket {
            name: file.name.clone(),
            size: file.size(),
        })
    }

    /// Apply the server's verdict on an upload. On failure the screen goes
    /// back to what it was before the upload started.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        outcome: Result<(), RagError>,
    ) -> Result<&UploadedFile, AppError> {
        let previous = match std::mem::take(&mut self.screen) {
            Screen::Uploading { previous, .. } => previous,
            other => {
                // Only reachable if a ticket outlived its upload.
                self.screen = other;
                return Err(AppError::Busy("no upload in progress"));
            }
        };

        if let Err(e) = outcome {
            tracing::warn!(name = %ticket.name, error = %e, "Upload failed");
            self.screen = match previous {
                Some(file) => Screen::FilePresent {
                    file,
                    loading: false,
                },
                None => Screen::default(),
            };
            self.touch();
            return Err(AppError::UploadFailed(e));
        }

        self.document += 1;
        self.messages.clear();
        self.messages.push(Message::bot(welcome_text(&ticket.name)));
        self.screen = Screen::FilePresent {
            file: UploadedFile {
                name: ticket.name,
                size: ticket.size,
                uploaded_at: Local::now(),
            },
            loading: false,
        };
        self.touch();
        tracing::info!("Document ready for questions");

        self.uploaded_file().ok_or(AppError::NoDocument)
    }

    /// Drop the document and the whole conversation. Returns whether a
    /// document was present.
    pub fn remove_file(&mut self) -> bool {
        if !matches!(self.screen, Screen::FilePresent { .. }) {
            return false;
        }
        self.document += 1;
        self.messages.clear();
        self.screen = Screen::default();
        self.touch();
        tracing::debug!("Document removed");
        true
    }

    /// Record the user's question and mark it in flight.
    pub fn begin_ask(&mut self, input: &str) -> Result<AskTicket, AppError> {
        if is_blank(input) {
            return Err(AppError::EmptyQuestion);
        }
        let loading = match &mut self.screen {
            Screen::FilePresent { loading, .. } => loading,
            _ => return Err(AppError::NoDocument),
        };
        if *loading {
            return Err(AppError::Busy("a question is still being answered"));
        }
        *loading = true;

        let question = input.trim().to_string();
        self.messages.push(Message::user(question.clone()));
        self.touch();
        Ok(AskTicket {
            question,
            document: self.document,
        })
    }

    /// Append the bot's reply (or the apology) and clear `loading`. Returns
    /// `None` when the document changed while the question was in flight and
    /// the reply was dropped.
    pub fn finish_ask(
        &mut self,
        ticket: AskTicket,
        outcome: Result<Option<String>, RagError>,
    ) -> Option<&Message> {
        if ticket.document != self.document {
            tracing::debug!("Dropping answer for a document that is gone");
            return None;
        }
        if let Screen::FilePresent { loading, .. } = &mut self.screen {
            *loading = false;
        }

        let content = match outcome {
            Ok(Some(answer)) => answer,
            Ok(None) => NO_ANSWER_TEXT.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Question failed");
                ASK_ERROR_TEXT.to_string()
            }
        };
        self.messages.push(Message::bot(content));
        self.touch();
        self.messages.last()
    }

    pub fn view(&self) -> SessionView {
        let (screen, drag_over, uploading_name) = match &self.screen {
            Screen::NoFile { drag_over } => (ScreenKind::NoFile, *drag_over, None),
            Screen::Uploading { file_name, .. } => {
                (ScreenKind::Uploading, false, Some(file_name.clone()))
            }
            Screen::FilePresent { .. } => (ScreenKind::FilePresent, false, None),
        };

        SessionView {
            revision: self.revision,
            screen,
            drag_over,
            uploading_name,
            file: self.uploaded_file().map(|f| FileView {
                name: f.name.clone(),
                size: f.size,
                size_label: format_file_size(f.size),
                uploaded_at: format_time(&f.uploaded_at),
            }),
            messages: self
                .messages
                .iter()
                .map(|m| MessageView {
                    id: m.id.clone(),
                    content: m.content.clone(),
                    sender: m.sender,
                    time: format_time(&m.timestamp),
                })
                .collect(),
            loading: self.is_loading(),
            can_chat: self.can_chat(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenKind {
    NoFile,
    Uploading,
    FilePresent,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileView {
    pub name: String,
    pub size: u64,
    pub size_label: String,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub time: String,
}

/// Render-ready snapshot of a [`ChatSession`].
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Increases with every change; an older view must not replace a newer one.
    pub revision: u64,
    pub screen: ScreenKind,
    pub drag_over: bool,
    pub uploading_name: Option<String>,
    pub file: Option<FileView>,
    pub messages: Vec<MessageView>,
    pub loading: bool,
    pub can_chat: bool,
}
