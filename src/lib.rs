pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod models;
pub mod rag;
pub mod session;
pub mod state;
pub mod validation;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use config::RagConfig;
    use state::AppState;
    use tauri::Manager;

    logging::init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let config = RagConfig::from_env()?;
            tracing::info!(
                server_url = %config.server_url,
                "Starting RAG PDF Chat v{}",
                env!("CARGO_PKG_VERSION")
            );
            app.manage(AppState::from_config(&config)?);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::chat::get_session,
            commands::chat::get_server_url,
            commands::chat::send_message,
            commands::document::check_pdf,
            commands::document::upload_pdf,
            commands::document::upload_pdf_path,
            commands::document::pick_and_upload_pdf,
            commands::document::remove_file,
            commands::document::set_drag_over,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
