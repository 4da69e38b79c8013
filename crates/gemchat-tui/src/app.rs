//! Application state and update logic for the chat box.

use std::cell::Cell;

use gemchat_engine::{Conversation, PendingTurn, Rejected, TurnOutcome};
use tracing::debug;

use crate::event::{key_to_action, Action};
use crate::widgets::TextInputState;
use crossterm::event::KeyEvent;

/// Lines moved per PageUp/PageDown.
const PAGE_LINES: usize = 10;

/// Notice shown when Enter is pressed while a reply is pending.
pub const BUSY_NOTICE: &str = "Waiting for reply...";

/// Chat box state: the conversation plus everything the screen needs.
#[derive(Debug)]
pub struct App {
    /// The turn manager being rendered.
    pub conversation: Conversation,
    /// Message being typed.
    pub input: TextInputState,
    /// Transcript lines scrolled up from the bottom (0 = follow newest).
    pub scroll: usize,
    /// Largest scroll offset at the last render.
    pub max_scroll: Cell<usize>,
    /// Tick counter driving the loading animation.
    pub tick: usize,
    /// Transient notice for the status bar.
    pub notice: Option<&'static str>,
    /// Should the app quit?
    pub should_quit: bool,
}

impl App {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            conversation,
            input: TextInputState::new(),
            scroll: 0,
            max_scroll: Cell::new(0),
            tick: 0,
            notice: None,
            should_quit: false,
        }
    }

    /// Whether a reply is pending.
    pub fn is_busy(&self) -> bool {
        self.conversation.is_busy()
    }

    /// Apply a key press. Returns a turn to run if the key submitted a message.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PendingTurn> {
        self.handle_action(key_to_action(key))
    }

    /// Apply an action. Returns a turn to run if the action submitted a message.
    pub fn handle_action(&mut self, action: Action) -> Option<PendingTurn> {
        if action != Action::None {
            self.notice = None;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::Submit => return self.submit_input(),
            Action::Insert(c) => self.input.insert(c),
            Action::Backspace => self.input.backspace(),
            Action::Delete => self.input.delete(),
            Action::Left => self.input.move_left(),
            Action::Right => self.input.move_right(),
            Action::Home => self.input.move_home(),
            Action::End => self.end(),
            Action::ClearInput => self.input.clear(),
            Action::HistoryPrev => self.up(),
            Action::HistoryNext => self.down(),
            Action::ScrollUp => self.scroll_up(1),
            Action::ScrollDown => self.scroll_down(1),
            Action::PageUp => self.scroll_up(PAGE_LINES),
            Action::PageDown => self.scroll_down(PAGE_LINES),
            Action::ScrollToBottom => self.scroll = 0,
            Action::None => {}
        }
        None
    }

    /// Insert pasted text into the input.
    pub fn paste(&mut self, text: &str) {
        self.input.insert_str(text);
    }

    /// Hand the typed text to the conversation.
    ///
    /// The input is cleared only when the conversation accepts it.
    pub fn submit_input(&mut self) -> Option<PendingTurn> {
        match self.conversation.begin_turn(self.input.content()) {
            Ok(pending) => {
                self.input.submit();
                self.scroll = 0;
                Some(pending)
            }
            Err(Rejected::Busy) => {
                self.notice = Some(BUSY_NOTICE);
                None
            }
            Err(Rejected::Empty) => None,
        }
    }

    /// Record the outcome of the turn started by [`Self::submit_input`].
    pub fn finish_turn(&mut self, outcome: TurnOutcome) {
        if self.conversation.settle(outcome).is_some() {
            self.scroll = 0;
        }
        debug!(messages = self.conversation.len(), "Turn finished");
    }

    /// Advance the animation clock.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Up recalls history from an empty input, otherwise scrolls.
    fn up(&mut self) {
        if self.input.is_empty() || self.input.is_browsing_history() {
            self.input.history_prev();
        } else {
            self.scroll_up(1);
        }
    }

    fn down(&mut self) {
        if self.input.is_browsing_history() {
            self.input.history_next();
        } else {
            self.scroll_down(1);
        }
    }

    /// End jumps to the newest message unless there is text to move through.
    fn end(&mut self) {
        if self.input.is_empty() {
            self.scroll = 0;
        } else {
            self.input.move_end();
        }
    }

    fn scroll_up(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.max_scroll.get());
    }

    fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }
}
