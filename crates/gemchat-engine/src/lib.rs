//! gemchat-engine: Headless conversation engine for a Gemini chat client
//!
//! This crate provides the core chat logic, including:
//! - Message model and the fixed fallback reply
//! - The conversation turn manager with its busy guard and change events
//! - A model client trait with Gemini HTTP and scripted mock implementations
//! - Session configuration

pub mod client;
pub mod config;
pub mod conversation;
pub mod gemini;
pub mod message;

// Re-export commonly used types
pub use client::{ClientError, MockClient, MockReply, ModelClient};
pub use config::{ChatConfig, ConfigError};
pub use conversation::{
    Conversation, ConversationEvent, PendingTurn, Rejected, TurnOutcome, TurnState,
};
pub use gemini::GeminiClient;
pub use message::{ChatMessage, Role, FALLBACK_REPLY};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
