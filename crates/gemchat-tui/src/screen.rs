//! The chat box screen.

use crate::app::App;
use crate::theme::Styles;
use crate::widgets::{KeyHint, StatusBar, TextInput, Transcript};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Title shown above the conversation.
pub const TITLE: &str = "Gemini Chatbox";

/// Placeholder shown in the empty input.
pub const INPUT_PLACEHOLDER: &str = "Type your message...";

/// Render the whole chat box.
///
/// ```text
///                 Gemini Chatbox
/// ┌──────────────────────────────────────────┐
/// │                                      You │
/// │                                   Hello  │
/// │ Gemini                                   │
/// │  Hi there!                               │
/// └──────────────────────────────────────────┘
/// ┌ Message ─────────────────────────────────┐
/// │ > Type your message...                   │
/// └──────────────────────────────────────────┘
///  gemini-pro   Enter  Send   Esc  Quit
/// ```
pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(3),    // Transcript
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    Paragraph::new(TITLE)
        .style(Styles::title())
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    render_transcript(app, chunks[1], buf);
    render_input(app, chunks[2], buf);
    render_status_bar(app, chunks[3], buf);
}

fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .style(Styles::default());
    let inner = block.inner(area);
    block.render(area, buf);

    let transcript = Transcript::new(app.conversation.messages())
        .busy(app.is_busy(), app.tick)
        .scroll(app.scroll);
    app.max_scroll.set(transcript.max_scroll(inner));
    transcript.render(inner, buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let border = if app.is_busy() {
        Styles::border()
    } else {
        Styles::border_active()
    };
    let block = Block::default()
        .title(" Message ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(border)
        .style(Styles::default());

    TextInput::new(&app.input)
        .block(block)
        .placeholder(INPUT_PLACEHOLDER)
        .focused(!app.is_busy())
        .render(area, buf);
}

fn render_status_bar(app: &App, area: Rect, buf: &mut Buffer) {
    let hints = vec![
        KeyHint::new("Enter", "Send").enabled(!app.is_busy()),
        KeyHint::new("PgUp/PgDn", "Scroll"),
        KeyHint::new("Esc", "Quit"),
    ];

    let count = message_count(app.conversation.len());
    let mut status_bar = StatusBar::new(app.conversation.model_name()).hints(hints);
    status_bar = match app.notice {
        Some(notice) => status_bar.warn(notice),
        None => status_bar.right(&count),
    };
    status_bar.render(area, buf);
}

fn message_count(n: usize) -> String {
    match n {
        1 => "1 message".into(),
        n => format!("{n} messages"),
    }
}
