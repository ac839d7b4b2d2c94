use tauri::{AppHandle, State};

use super::emit_view;
use crate::error::AppError;
use crate::session::SessionView;
use crate::state::AppState;

#[tauri::command]
pub fn get_session(state: State<'_, AppState>) -> SessionView {
    state.view()
}

#[tauri::command]
pub fn get_server_url(state: State<'_, AppState>) -> String {
    state.server_url().to_string()
}

#[tauri::command]
pub async fn send_message(
    app: AppHandle,
    state: State<'_, AppState>,
    content: String,
) -> Result<SessionView, AppError> {
    let view = state
        .ask(&content, |view| emit_view(&app, &view))
        .await?;
    emit_view(&app, &view);
    Ok(view)
}
