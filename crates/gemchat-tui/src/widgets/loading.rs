//! Three pulsing dots shown while a reply is pending.

use crate::theme::{Palette, Styles, Symbols};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

/// Number of dots in the indicator.
const DOTS: usize = 3;

/// Ticks each dot stays highlighted before the next one lights up.
pub const TICKS_PER_DOT: usize = 2;

/// Loading indicator whose highlighted dot advances with the UI tick.
#[derive(Debug, Clone, Copy)]
pub struct LoadingDots {
    tick: usize,
}

impl LoadingDots {
    pub fn new(tick: usize) -> Self {
        Self { tick }
    }

    /// Index of the currently highlighted dot.
    pub fn phase(&self) -> usize {
        (self.tick / TICKS_PER_DOT) % DOTS
    }

    /// Render as a single line, padded like an assistant bubble.
    pub fn line(&self) -> Line<'static> {
        let bubble = Styles::assistant_bubble();
        let mut spans = vec![Span::styled(" ", bubble)];
        for i in 0..DOTS {
            let style = if i == self.phase() {
                bubble
            } else {
                Style::default().fg(Palette::DIM).bg(Palette::ASSISTANT_BG)
            };
            spans.push(Span::styled(Symbols::DOT, style));
            spans.push(Span::styled(" ", bubble));
        }
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_cycles() {
        let phases: Vec<usize> = (0..8).map(|t| LoadingDots::new(t).phase()).collect();
        assert_eq!(phases, vec![0, 0, 1, 1, 2, 2, 0, 0]);
    }

    #[test]
    fn test_line_has_three_dots() {
        let line = LoadingDots::new(0).line();
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " • • • ");
    }
}
