//! One-shot exchanges with an OpenAI-compatible chat endpoint, plus the
//! visible transcript those exchanges produce.

pub mod client;
pub mod conversation;
pub mod error;
pub mod prompt;

pub use client::AssistantClient;
pub use conversation::{Conversation, Exchange, Role, TranscriptEntry};
pub use error::AssistantError;
pub use prompt::SYSTEM_PROMPT;
