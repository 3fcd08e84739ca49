//! Interactive terminal front end.

use std::sync::Arc;

use chatterm_shared::time::SystemClock;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    config::ClientConfig,
    domain::{ClientEvent, KeyPress},
    error::ClientError,
    session::run_session,
    view::{PROMPT, TerminalView},
};

/// Run the chat client against the configured endpoint until the
/// connection ends or the user leaves. There is no reconnection.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    tracing::info!("Connecting to {}", config.url());
    println!("\nType messages and press Enter to send. Press Ctrl+C to exit.\n");

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let _readline_handle = spawn_line_editor(events_tx.clone());

    let outcome = run_session(
        config.url(),
        TerminalView::new(std::io::stdout()),
        Arc::new(SystemClock),
        events_tx,
        events_rx,
    )
    .await;

    outcome.result
}

/// Events produced by one line entered in the editor
///
/// The line editor returns after Enter, so an entered line is the input
/// changing to that text followed by a plain Enter key press.
fn line_events(line: String) -> [ClientEvent; 2] {
    [
        ClientEvent::InputChanged(line),
        ClientEvent::KeyPressed(KeyPress::enter()),
    ]
}

/// Read lines on a blocking thread and turn each into input events
fn spawn_line_editor(
    events_tx: mpsc::UnboundedSender<ClientEvent>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                let _ = events_tx.send(ClientEvent::QuitRequested);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str()).ok();
                    }
                    let sent = line_events(line)
                        .into_iter()
                        .try_for_each(|event| events_tx.send(event));
                    if sent.is_err() {
                        // Session is over
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    tracing::info!("Exit requested");
                    let _ = events_tx.send(ClientEvent::QuitRequested);
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    let _ = events_tx.send(ClientEvent::QuitRequested);
                    break;
                }
            }
        }
    })
}
