//! Terminal front-end: the same session as the desktop app, driven from stdin.

use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use rag_pdf_chat_lib::config::RagConfig;
use rag_pdf_chat_lib::error::AppError;
use rag_pdf_chat_lib::logging;
use rag_pdf_chat_lib::models::Sender;
use rag_pdf_chat_lib::session::{ScreenKind, SessionView};
use rag_pdf_chat_lib::state::AppState;

const HELP: &str = "\
Type a question and press Enter to ask it.
  /upload <path>   upload a PDF (replaces the current one)
  /remove          remove the document and clear the chat
  /status          show the current document
  /help            show this help
  /quit            exit";

#[derive(Parser, Debug)]
#[command(name = "rag-pdf-chat-cli", about = "Chat with a PDF through a RAG server")]
struct Cli {
    /// RAG server base URL (defaults to RAG_SERVER_URL)
    #[arg(long)]
    server_url: Option<String>,

    /// Request timeout in seconds (defaults to RAG_REQUEST_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// PDF to upload on start
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Debug, PartialEq)]
enum Input {
    Upload(PathBuf),
    Remove,
    Status,
    Help,
    Quit,
    Question(String),
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return Input::Question(line.to_string());
        };
        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map(|(n, a)| (n, a.trim()))
            .unwrap_or((command, ""));

        match name {
            "upload" if !arg.is_empty() => Input::Upload(PathBuf::from(arg)),
            "remove" => Input::Remove,
            "status" => Input::Status,
            "help" => Input::Help,
            "quit" | "exit" => Input::Quit,
            _ => Input::Unknown(line.to_string()),
        }
    }
}

/// Prints messages the terminal has not shown yet.
#[derive(Default)]
struct Transcript {
    shown: HashSet<String>,
}

impl Transcript {
    fn render(&mut self, view: &SessionView) {
        if view.messages.is_empty() {
            self.shown.clear();
        }
        for message in &view.messages {
            if self.shown.insert(message.id.clone()) {
                let who = match message.sender {
                    Sender::User => "you",
                    Sender::Bot => "bot",
                };
                println!("[{}] {}: {}", message.time, who, message.content);
            }
        }
    }
}

fn progress(view: SessionView) {
    match view.screen {
        ScreenKind::Uploading => {
            let name = view.uploading_name.unwrap_or_default();
            println!("Uploading {name}... please wait while the document is processed");
        }
        ScreenKind::FilePresent if view.loading => println!("Thinking..."),
        _ => {}
    }
}

fn status(view: &SessionView) {
    match &view.file {
        Some(file) => println!(
            "{} ({}) uploaded {}",
            file.name, file.size_label, file.uploaded_at
        ),
        None => println!("No document. Use /upload <path> to add a PDF (max 50MB)."),
    }
}

async fn upload(state: &AppState, transcript: &mut Transcript, path: &std::path::Path) {
    match state.upload_path(path, progress).await {
        Ok(view) => {
            transcript.render(&view);
            status(&view);
        }
        Err(e) => eprintln!("! {e}"),
    }
}

async fn repl(state: &AppState, mut transcript: Transcript) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };

        match Input::parse(&line) {
            Input::Upload(path) => upload(state, &mut transcript, &path).await,
            Input::Remove => {
                let view = state.remove_file();
                transcript.render(&view);
                println!("Document removed.");
            }
            Input::Status => status(&state.view()),
            Input::Help => println!("{HELP}"),
            Input::Quit => return Ok(()),
            Input::Unknown(command) => eprintln!("! Unknown command: {command} (try /help)"),
            Input::Question(question) => match state.ask(&question, progress).await {
                Ok(view) => transcript.render(&view),
                Err(AppError::EmptyQuestion) => {}
                Err(e) => eprintln!("! {e}"),
            },
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = RagConfig::from_env()?;
    if let Some(url) = cli.server_url.as_deref() {
        config = RagConfig::new(url)?.with_timeout(config.request_timeout);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    tracing::info!(server_url = %config.server_url, "RAG PDF Chat v{}", env!("CARGO_PKG_VERSION"));
    let state = AppState::from_config(&config)?;
    let mut transcript = Transcript::default();

    status(&state.view());
    if let Some(path) = cli.file.as_deref() {
        upload(&state, &mut transcript, path).await;
    }
    println!("{HELP}");

    repl(&state, transcript).await
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Exiting");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Input::parse("/upload  ./docs/my paper.pdf "),
            Input::Upload(PathBuf::from("./docs/my paper.pdf"))
        );
        assert_eq!(Input::parse("/remove"), Input::Remove);
        assert_eq!(Input::parse(" /quit"), Input::Quit);
        assert_eq!(Input::parse("/exit"), Input::Quit);
        assert_eq!(Input::parse("/upload"), Input::Unknown("/upload".into()));
        assert_eq!(Input::parse("/nope"), Input::Unknown("/nope".into()));
    }

    #[test]
    fn test_plain_text_is_a_question() {
        assert_eq!(
            Input::parse("What is the answer? "),
            Input::Question("What is the answer?".into())
        );
        assert_eq!(Input::parse("   "), Input::Question(String::new()));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "rag-pdf-chat-cli",
            "--server-url",
            "http://127.0.0.1:5000",
            "--file",
            "a.pdf",
        ])
        .unwrap();
        assert_eq!(cli.server_url.as_deref(), Some("http://127.0.0.1:5000"));
        assert_eq!(cli.file, Some(PathBuf::from("a.pdf")));
        assert_eq!(cli.timeout_secs, None);
    }
}
