//! Message and turn types shared across the chat crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a conversation turn.
///
/// Allocated by the owning [`crate::history::ChatHistory`] from a counter
/// that only ever moves forward, so ids never collide within a process.
pub type TurnId = u64;

/// Who authored a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Lifecycle state of a message.
///
/// A user message is born in `Sent` and stays there. An assistant message
/// walks through the states as decoder events arrive and ends in one of the
/// terminal states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Initial state, before any stream event has been observed.
    Sent,
    /// A reasoning token has arrived and the reply is still thinking.
    Reasoning,
    /// Answer content is arriving.
    Streaming,
    /// The stream finished normally.
    Done,
    /// The user cancelled the exchange.
    Abort,
    /// The exchange failed; content holds the fixed failure text.
    Error,
}

impl MessageStatus {
    /// Terminal states admit no further transitions; the message fields are
    /// frozen once one is reached.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Abort | Self::Error)
    }
}

/// A single chat message.
///
/// `content` and `reasoning_content` only ever hold sanitized text; raw
/// model output never reaches these fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Pre-answer reasoning trace, assistant messages only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
    pub status: MessageStatus,
}

impl Message {
    /// A user message is complete the moment it is created.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            reasoning_content: None,
            status: MessageStatus::Sent,
        }
    }

    /// An empty assistant reply awaiting stream events.
    pub fn assistant() -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            reasoning_content: Some(String::new()),
            status: MessageStatus::Sent,
        }
    }
}

/// One user utterance and its assistant reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    pub id: TurnId,
    pub created_at: DateTime<Utc>,
    pub user: Message,
    pub assistant: Message,
}

impl Turn {
    pub fn new(id: TurnId, user_text: impl Into<String>) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            user: Message::user(user_text),
            assistant: Message::assistant(),
        }
    }
}
