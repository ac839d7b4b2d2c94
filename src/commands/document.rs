use std::path::PathBuf;

use tauri::ipc::{InvokeBody, Request};
use tauri::{AppHandle, State};
use tauri_plugin_dialog::DialogExt;

use super::emit_view;
use crate::error::AppError;
use crate::models::{PdfFile, MIME_HEADER, NAME_HEADER};
use crate::session::SessionView;
use crate::state::AppState;
use crate::validation::validate_declared;

/// Refuse a dropped file from its declared type and size, before the
/// webview reads it into memory.
#[tauri::command]
pub fn check_pdf(mime_type: String, size: u64) -> Result<(), AppError> {
    validate_declared(&mime_type, size)?;
    Ok(())
}

/// Upload a file the webview already read, e.g. from a drop. The body is the
/// raw file; name and type travel in headers.
#[tauri::command]
pub async fn upload_pdf(
    app: AppHandle,
    state: State<'_, AppState>,
    request: Request<'_>,
) -> Result<SessionView, AppError> {
    let InvokeBody::Raw(bytes) = request.body() else {
        return Err(AppError::InvalidRequest("upload body must be raw bytes"));
    };
    let file = PdfFile::from_ipc(
        header(&request, NAME_HEADER),
        header(&request, MIME_HEADER),
        bytes.clone(),
    );

    let outcome = state.upload(file, |view| emit_view(&app, &view)).await;
    publish(&app, &state, outcome)
}

#[tauri::command]
pub async fn upload_pdf_path(
    app: AppHandle,
    state: State<'_, AppState>,
    path: String,
) -> Result<SessionView, AppError> {
    let path = PathBuf::from(path);
    let outcome = state.upload_path(&path, |view| emit_view(&app, &view)).await;
    publish(&app, &state, outcome)
}

/// Open the native file picker filtered to PDFs and upload the choice.
/// Returns `None` if the user cancelled.
#[tauri::command]
pub async fn pick_and_upload_pdf(
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<Option<SessionView>, AppError> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    app.dialog()
        .file()
        .add_filter("PDF", &["pdf"])
        .pick_file(move |picked| {
            let _ = tx.send(picked);
        });

    let Some(picked) = rx.await.ok().flatten() else {
        tracing::debug!("File picker cancelled");
        return Ok(None);
    };
    let path = picked
        .into_path()
        .map_err(|e| AppError::Io(std::io::Error::other(e.to_string())))?;

    let outcome = state.upload_path(&path, |view| emit_view(&app, &view)).await;
    publish(&app, &state, outcome).map(Some)
}

#[tauri::command]
pub fn remove_file(app: AppHandle, state: State<'_, AppState>) -> SessionView {
    let view = state.remove_file();
    emit_view(&app, &view);
    view
}

#[tauri::command]
pub fn set_drag_over(state: State<'_, AppState>, active: bool) -> SessionView {
    state.set_drag_over(active)
}

fn header<'a>(request: &'a Request<'_>, name: &str) -> &'a str {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Emit the post-upload view. A failed upload has already restored the
/// previous screen, so the spinner goes away before the webview alerts.
fn publish(
    app: &AppHandle,
    state: &AppState,
    outcome: Result<SessionView, AppError>,
) -> Result<SessionView, AppError> {
    let view = match &outcome {
        Ok(view) => view.clone(),
        Err(_) => state.view(),
    };
    emit_view(app, &view);
    outcome
}
