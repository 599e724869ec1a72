//! chat_core - Core types for the streaming chat stack
//!
//! This crate provides the foundational pieces used across the chat crates:
//! - `message` - Turn, Message, Role and MessageStatus
//! - `sanitize` - markup stripping for untrusted model output
//! - `config` - chat and transcription endpoint configuration
//! - `history` - the bounded, optionally persisted conversation history

pub mod config;
pub mod history;
pub mod message;
pub mod sanitize;

// Re-export commonly used types
pub use config::{AudioConfig, ChatConfig};
pub use history::{ChatHistory, FileHistoryStore, HistoryError, HistoryStore, MAX_HISTORY};
pub use message::{Message, MessageStatus, Role, Turn, TurnId};
pub use sanitize::sanitize;
