//! State machine module
//!
//! Event types and the per-turn transition logic.

mod events;
mod transitions;

pub use events::{ProtocolEvent, TurnEvent};
pub use transitions::{FinalDiscipline, StateTransition, TurnMachine, FAILURE_MESSAGE};
