//! Remote model client abstraction.
//!
//! The turn manager only ever talks to a [`ModelClient`]. Transport,
//! serialization and vendor details live in the implementors
//! ([`crate::GeminiClient`] for the real service, [`MockClient`] for tests
//! and offline use).

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// A single-shot text generation endpoint.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the raw user text and return the model's full response text.
    async fn generate(&self, prompt: &str) -> Result<String, ClientError>;

    /// Name of the model behind this client (for logs and the status bar).
    fn model_name(&self) -> &str;
}

/// Errors raised by a [`ModelClient`].
///
/// These stay internal to the engine: at the turn boundary every variant
/// collapses into [`crate::FALLBACK_REPLY`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (connect, TLS, request timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// Response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The prompt or the reply was withheld by the service's filters.
    #[error("Response blocked: {0}")]
    Blocked(String),

    /// No response within the turn timeout.
    #[error("Model did not respond within {0:?}")]
    Timeout(Duration),

    /// Model is unreachable or refused the request.
    #[error("Model unavailable: {0}")]
    Unavailable(String),
}

/// One scripted response for a [`MockClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Succeed with this text.
    Text(String),
    /// Fail with [`ClientError::Unavailable`] carrying this reason.
    Fail(String),
    /// Never settle.
    Hang,
}

/// In-process model client that plays back a script.
///
/// Once the script is exhausted it echoes the prompt back.
#[derive(Debug)]
pub struct MockClient {
    model: String,
    script: Mutex<VecDeque<MockReply>>,
    prompts: Mutex<Vec<String>>,
}

impl MockClient {
    /// Create an echoing mock client.
    pub fn new() -> Self {
        Self::with_script(Vec::new())
    }

    /// Create a mock client that answers with `replies` in order.
    pub fn with_script(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            model: "mock".into(),
            script: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for a client whose next reply is `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_script([MockReply::Text(text.into())])
    }

    /// Shorthand for a client whose next call fails.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_script([MockReply::Fail(reason.into())])
    }

    /// Shorthand for a client whose next call never settles.
    pub fn hanging() -> Self {
        Self::with_script([MockReply::Hang])
    }

    /// Queue another reply.
    pub fn push(&self, reply: MockReply) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelClient for MockClient {
    async fn generate(&self, prompt: &str) -> Result<String, ClientError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(reason)) => Err(ClientError::Unavailable(reason)),
            Some(MockReply::Hang) => std::future::pending().await,
            None => Ok(format!("Echo: {prompt}")),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_plays_script_then_echoes() {
        let client = MockClient::with_script([
            MockReply::Text("first".into()),
            MockReply::Fail("offline".into()),
        ]);

        assert_eq!(client.generate("a").await.unwrap(), "first");
        assert!(matches!(
            client.generate("b").await,
            Err(ClientError::Unavailable(reason)) if reason == "offline"
        ));
        assert_eq!(client.generate("c").await.unwrap(), "Echo: c");
        assert_eq!(client.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_mock_hang_never_settles() {
        let client = MockClient::hanging();
        let result =
            tokio::time::timeout(Duration::from_millis(20), client.generate("hello")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_client_error_messages() {
        let err = ClientError::Status {
            status: 403,
            body: "denied".into(),
        };
        assert_eq!(err.to_string(), "API returned 403: denied");
        assert_eq!(
            ClientError::Blocked("SAFETY".into()).to_string(),
            "Response blocked: SAFETY"
        );
    }
}
