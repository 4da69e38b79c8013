//! Conversation turn manager.
//!
//! A [`Conversation`] owns the message list and the busy flag. A turn moves
//! through two explicit steps so callers can observe the pending state:
//!
//! 1. [`Conversation::begin_turn`] records the user message, marks the
//!    conversation busy and hands back a [`PendingTurn`].
//! 2. [`Conversation::settle`] records the assistant reply (or
//!    [`crate::FALLBACK_REPLY`]) and clears the busy flag.
//!
//! The [`PendingTurn`] borrows nothing from the conversation, so it can be
//! spawned onto a runtime while the owner keeps rendering.
//! [`Conversation::submit`] runs both steps back to back.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::{ClientError, ModelClient};
use crate::message::ChatMessage;

/// Whether a turn is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    /// No request in flight; submissions are accepted.
    #[default]
    Idle,
    /// A user message is waiting for its reply.
    Pending,
}

/// Why a submission was not accepted. Rejections never change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejected {
    /// Text was empty or whitespace only.
    #[error("message is empty")]
    Empty,
    /// Another turn is still pending.
    #[error("a reply is still pending")]
    Busy,
}

/// How a remote call ended.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The model answered with this text.
    Replied(String),
    /// The call failed; the reason is kept for diagnostics only.
    Failed(ClientError),
}

impl TurnOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TurnOutcome::Replied(_))
    }
}

/// Change notifications for whatever renders the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    /// A message was appended at `index`.
    MessageAppended {
        /// Position in the message list.
        index: usize,
        /// The appended message.
        message: ChatMessage,
    },
    /// The busy flag changed to this value.
    BusyChanged(bool),
}

/// An accepted submission whose remote call has not run yet.
#[must_use = "a pending turn does nothing until resolved and settled"]
pub struct PendingTurn {
    client: Arc<dyn ModelClient>,
    prompt: String,
    timeout: Option<Duration>,
    session: Uuid,
}

impl PendingTurn {
    /// The raw user text that will be sent.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Run the remote call. Never fails: errors become [`TurnOutcome::Failed`].
    pub async fn resolve(self) -> TurnOutcome {
        let call = self.client.generate(&self.prompt);

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(ClientError::Timeout(limit))),
            None => call.await,
        };

        match result {
            Ok(text) => {
                debug!(session = %self.session, reply_len = text.len(), "Model replied");
                TurnOutcome::Replied(text)
            }
            Err(e) => {
                warn!(
                    session = %self.session,
                    model = %self.client.model_name(),
                    error = %e,
                    "Model call failed"
                );
                TurnOutcome::Failed(e)
            }
        }
    }
}

/// The conversation turn manager.
pub struct Conversation {
    id: Uuid,
    client: Arc<dyn ModelClient>,
    messages: Vec<ChatMessage>,
    state: TurnState,
    turn_timeout: Option<Duration>,
    subscribers: Vec<mpsc::UnboundedSender<ConversationEvent>>,
}

impl Conversation {
    /// Create an empty conversation backed by `client`, with no turn timeout.
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            id: Uuid::new_v4(),
            client,
            messages: Vec::new(),
            state: TurnState::Idle,
            turn_timeout: None,
            subscribers: Vec::new(),
        }
    }

    /// Settle turns that take longer than `timeout` as failed. `None` waits forever.
    #[must_use]
    pub fn with_turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Session ID, used to correlate log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Messages in conversation order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Whether a turn is outstanding.
    pub fn is_busy(&self) -> bool {
        self.state == TurnState::Pending
    }

    /// Name of the model answering this conversation.
    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub fn turn_timeout(&self) -> Option<Duration> {
        self.turn_timeout
    }

    /// Receive a [`ConversationEvent`] for every subsequent change.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ConversationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Accept `text` as the next user message and start a turn.
    ///
    /// The message is stored exactly as given; trimming only decides whether
    /// it is empty.
    pub fn begin_turn(&mut self, text: &str) -> Result<PendingTurn, Rejected> {
        if text.trim().is_empty() {
            return Err(Rejected::Empty);
        }
        if self.is_busy() {
            debug!(session = %self.id, "Rejecting submission while a reply is pending");
            return Err(Rejected::Busy);
        }

        self.push(ChatMessage::user(text));
        self.set_state(TurnState::Pending);
        info!(session = %self.id, turn = self.messages.len(), "Turn started");

        Ok(PendingTurn {
            client: Arc::clone(&self.client),
            prompt: text.to_string(),
            timeout: self.turn_timeout,
            session: self.id,
        })
    }

    /// Record the result of the pending turn and return to idle.
    ///
    /// Returns the appended assistant message, or `None` if no turn was pending.
    pub fn settle(&mut self, outcome: TurnOutcome) -> Option<&ChatMessage> {
        if !self.is_busy() {
            warn!(session = %self.id, "Ignoring settle with no pending turn");
            return None;
        }
        Some(self.record_reply(outcome))
    }

    /// Run a whole turn: begin, wait for the model, settle.
    ///
    /// Returns the assistant message appended for this turn.
    pub async fn submit(&mut self, text: &str) -> Result<&ChatMessage, Rejected> {
        let pending = self.begin_turn(text)?;
        let outcome = pending.resolve().await;
        Ok(self.record_reply(outcome))
    }

    fn record_reply(&mut self, outcome: TurnOutcome) -> &ChatMessage {
        let message = match outcome {
            TurnOutcome::Replied(text) => ChatMessage::assistant(text),
            TurnOutcome::Failed(_) => ChatMessage::fallback(),
        };
        self.push(message);
        self.set_state(TurnState::Idle);
        info!(session = %self.id, turn = self.messages.len(), "Turn settled");

        &self.messages[self.messages.len() - 1]
    }

    fn push(&mut self, message: ChatMessage) {
        let index = self.messages.len();
        self.messages.push(message.clone());
        self.emit(&ConversationEvent::MessageAppended { index, message });
    }

    fn set_state(&mut self, state: TurnState) {
        if self.state != state {
            self.state = state;
            self.emit(&ConversationEvent::BusyChanged(state == TurnState::Pending));
        }
    }

    fn emit(&mut self, event: &ConversationEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("id", &self.id)
            .field("model", &self.client.model_name())
            .field("messages", &self.messages.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
