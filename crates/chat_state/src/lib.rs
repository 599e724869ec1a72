//! chat_state - Message lifecycle state machine
//!
//! Drives one conversation turn's assistant reply through its states in
//! response to decoded stream events, cancellation or stream exhaustion.

pub mod machine;

// Re-export commonly used types
pub use machine::{FinalDiscipline, ProtocolEvent, StateTransition, TurnEvent, TurnMachine, FAILURE_MESSAGE};
