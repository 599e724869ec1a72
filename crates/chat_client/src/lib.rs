//! chat_client - Streaming chat exchange and transcription upload
//!
//! The interaction engine: a cancellable streaming exchange driving the
//! per-turn state machine, the line-oriented stream decoder behind it, the
//! fixed-delay retry policy and the transcription upload client.

pub mod error;
pub mod prompt;
pub mod retry;
pub mod session;
pub mod stream;
pub mod transcribe;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use retry::with_retry;
pub use session::{CancelHandle, ChatSession, Endpoint};
pub use stream::{PayloadShape, StreamDecoder};
pub use transcribe::TranscriptionClient;
