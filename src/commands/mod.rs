pub mod chat;
pub mod document;

use tauri::{AppHandle, Emitter};

use crate::session::SessionView;

/// Emitted with a fresh [`SessionView`] whenever the session changes.
pub const SESSION_EVENT: &str = "session-changed";

fn emit_view(app: &AppHandle, view: &SessionView) {
    if let Err(e) = app.emit(SESSION_EVENT, view.clone()) {
        tracing::warn!(error = %e, "Failed to emit session event");
    }
}
