//! Status bar widget.

use crate::theme::{Palette, Styles};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

/// A key hint for the status bar.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
    pub enabled: bool,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            enabled: true,
        }
    }

    /// Render the hint greyed out when `enabled` is false.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Status bar widget displayed at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    mode: &'a str,
    hints: Vec<KeyHint>,
    right_text: Option<&'a str>,
    right_warning: bool,
}

impl<'a> StatusBar<'a> {
    pub fn new(mode: &'a str) -> Self {
        Self {
            mode,
            hints: Vec::new(),
            right_text: None,
            right_warning: false,
        }
    }

    #[must_use]
    pub fn hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    /// Set right-aligned text.
    #[must_use]
    pub fn right(mut self, text: &'a str) -> Self {
        self.right_text = Some(text);
        self
    }

    /// Set right-aligned text in the warning color.
    #[must_use]
    pub fn warn(mut self, text: &'a str) -> Self {
        self.right_text = Some(text);
        self.right_warning = true;
        self
    }
}

impl Widget for StatusBar<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        for x in area.x..area.x.saturating_add(area.width) {
            buf[(x, area.y)].set_char(' ').set_bg(Palette::STATUS_BG);
        }

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.mode),
                Styles::default().bg(Palette::ACCENT).fg(Palette::BG),
            ),
            Span::styled(" ", Styles::status_bar()),
        ];

        for hint in &self.hints {
            let key_style = if hint.enabled {
                Styles::key_hint()
            } else {
                Styles::key_hint_disabled()
            };
            spans.push(Span::styled(format!(" {} ", hint.key), key_style));
            spans.push(Span::styled(format!(" {} ", hint.label), Styles::key_label()));
        }

        let left_line = Line::from(spans);
        let left_width = left_line.width() as u16;
        buf.set_line(area.x, area.y, &left_line, area.width);

        if let Some(text) = self.right_text {
            let text_len = text.width() as u16;
            if left_width + text_len + 1 < area.width {
                let x = area.x + area.width - text_len - 1;
                let style = if self.right_warning {
                    Styles::warning()
                } else {
                    Styles::status_bar()
                };
                buf.set_string(x, area.y, text, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn test_status_bar_layout() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new("gemini-pro")
            .hints(vec![KeyHint::new("Enter", "Send")])
            .right("2 messages")
            .render(area, &mut buf);

        let out = buffer_to_string(&buf);
        assert!(out.starts_with(" gemini-pro "));
        assert!(out.contains(" Enter  Send "));
        assert!(out.ends_with("2 messages"));
    }

    #[test]
    fn test_right_text_dropped_when_crowded() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new("gemini-pro")
            .hints(vec![KeyHint::new("Enter", "Send")])
            .right("2 messages")
            .render(area, &mut buf);

        assert!(!buffer_to_string(&buf).contains("messages"));
    }

    #[test]
    fn test_disabled_hint_style() {
        let hint = KeyHint::new("Enter", "Send").enabled(false);
        assert!(!hint.enabled);
    }
}
