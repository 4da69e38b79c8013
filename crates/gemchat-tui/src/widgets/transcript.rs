//! Scrollable message transcript.

use gemchat_engine::{ChatMessage, Role};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::LoadingDots;
use crate::theme::{Styles, Symbols};

/// Share of the transcript width a bubble may occupy, in percent.
const BUBBLE_WIDTH_PERCENT: usize = 80;

/// Transcript widget: one labelled bubble per message, newest at the bottom.
///
/// ```text
///                                          You
///                                     Hello
///  Gemini
///  Hi there!
///  Gemini
///  • • •
/// ```
pub struct Transcript<'a> {
    messages: &'a [ChatMessage],
    busy: bool,
    tick: usize,
    /// Lines scrolled up from the bottom.
    scroll: usize,
}

impl<'a> Transcript<'a> {
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self {
            messages,
            busy: false,
            tick: 0,
            scroll: 0,
        }
    }

    /// Show the loading indicator, animated by `tick`.
    #[must_use]
    pub fn busy(mut self, busy: bool, tick: usize) -> Self {
        self.busy = busy;
        self.tick = tick;
        self
    }

    #[must_use]
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// All transcript lines laid out for `width` columns.
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let bubble_width = (width * BUBBLE_WIDTH_PERCENT / 100).max(3);
        let mut lines = Vec::new();

        for message in self.messages {
            push_message(&mut lines, message, bubble_width);
        }

        if self.busy {
            lines.push(Line::from(Span::styled(Symbols::BOT, Styles::label())));
            lines.push(LoadingDots::new(self.tick).line());
        }

        lines
    }

    /// Largest useful scroll offset for a viewport of `area`.
    pub fn max_scroll(&self, area: Rect) -> usize {
        self.lines(area.width as usize)
            .len()
            .saturating_sub(area.height as usize)
    }
}

fn push_message(lines: &mut Vec<Line<'static>>, message: &ChatMessage, bubble_width: usize) {
    let (label, style, alignment) = match message.role {
        Role::User => (Symbols::USER, Styles::user_bubble(), Alignment::Right),
        Role::Assistant => (Symbols::BOT, Styles::assistant_bubble(), Alignment::Left),
    };

    lines.push(Line::from(Span::styled(label, Styles::label())).alignment(alignment));

    // One column of padding on each side of the text.
    let text_width = bubble_width.saturating_sub(2).max(1);
    let wrapped: Vec<String> = message
        .content
        .split('\n')
        .flat_map(|paragraph| {
            textwrap::wrap(paragraph, text_width)
                .into_iter()
                .map(std::borrow::Cow::into_owned)
                .collect::<Vec<_>>()
        })
        .collect();
    let widest = wrapped.iter().map(|l| l.width()).max().unwrap_or(0);

    for text in wrapped {
        let padding = " ".repeat(widest - text.width());
        lines.push(
            Line::from(Span::styled(format!(" {text}{padding} "), style)).alignment(alignment),
        );
    }

    lines.push(Line::from(""));
}

impl Widget for Transcript<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if self.messages.is_empty() && !self.busy {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Send a message to start chatting.",
                    Styles::dim(),
                )),
            ])
            .alignment(Alignment::Center)
            .style(Styles::default());
            hint.render(area, buf);
            return;
        }

        let lines = self.lines(area.width as usize);
        let height = area.height as usize;
        let max_scroll = lines.len().saturating_sub(height);
        let start = max_scroll - self.scroll.min(max_scroll);

        let visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();
        Paragraph::new(visible)
            .style(Styles::default())
            .render(area, buf);
    }
}
