use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing on stderr.
///
/// Default level is INFO with DEBUG for this crate; override via `RUST_LOG`.
/// Safe to call more than once, later calls are ignored.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rag_pdf_chat_lib=debug"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .compact();

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .is_ok()
    {
        tracing::debug!("Tracing initialized");
    }
}
