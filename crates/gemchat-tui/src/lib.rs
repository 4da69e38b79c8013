//! gemchat-tui: Terminal chat box for a Gemini conversation
//!
//! This crate renders a [`gemchat_engine::Conversation`] and feeds user input
//! back into it:
//! - Transcript with user and assistant bubbles
//! - Loading indicator while a reply is pending
//! - Single-line input with history recall

mod app;
mod event;
mod screen;
#[cfg(test)]
pub mod test_utils;
mod theme;
mod widgets;

pub use app::App;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use gemchat_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gemchat_engine::{ClientError, Conversation, TurnOutcome};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// UI tick rate; two ticks advance the loading dots by one.
const TICK_RATE_MS: u64 = 200;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the chat box until the user quits.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit. Must be called from within a tokio runtime.
pub async fn run_tui(conversation: Conversation) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(session = %conversation.id(), model = %conversation.model_name(), "Chat box started");

    let mut app = App::new(conversation);
    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    // At most one turn is in flight; the conversation rejects a second one.
    let mut turn: Option<JoinHandle<TurnOutcome>> = None;

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            screen::render(app, area, frame.buffer_mut());
        })?;

        // Settle a finished turn (non-blocking check)
        if turn.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = turn.take() {
                let outcome = handle.await.unwrap_or_else(|e| {
                    warn!(error = %e, "Turn task ended abnormally");
                    TurnOutcome::Failed(ClientError::Unavailable(e.to_string()))
                });
                app.finish_turn(outcome);
                continue;
            }
        }

        match events.next().await {
            Some(Event::Key(key)) => {
                if let Some(pending) = app.handle_key(key) {
                    turn = Some(tokio::spawn(pending.resolve()));
                }
            }
            Some(Event::Paste(text)) => app.paste(&text),
            Some(Event::Tick) => app.tick(),
            // Terminal will handle resize automatically
            Some(Event::Resize(_, _)) => {}
            None => break,
        }

        if app.should_quit {
            if let Some(handle) = turn.take() {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
