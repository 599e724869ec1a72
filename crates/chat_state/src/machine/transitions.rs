//! Per-turn transition logic.
//!
//! The machine owns one [`Turn`] for the duration of an exchange and is the
//! only writer of its assistant message. Every text fragment is sanitized
//! before it lands in a message field, and both fields freeze the moment a
//! terminal state is reached.

use chat_core::message::{MessageStatus, Turn};
use chat_core::sanitize;
use log::debug;

use super::events::{ProtocolEvent, TurnEvent};

/// Fixed user-facing text shown in place of the reply when an exchange
/// fails. The underlying error is surfaced to the caller, never displayed.
pub const FAILURE_MESSAGE: &str = "The server is busy right now, please try again later.";

/// What a `final` event does to the reply status.
///
/// Call sites disagree on this: some keep the reply `streaming` until the
/// connection closes, others finish it on the spot. Both rules are
/// available behind this switch instead of hard-coding one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalDiscipline {
    /// `final` leaves the reply `streaming`; `done` comes from stream
    /// exhaustion.
    #[default]
    DeferToClose,
    /// `final` finishes the reply immediately.
    ImmediateDone,
}

/// Record of a single applied event.
#[derive(Debug, Clone)]
pub struct StateTransition {
    pub from: MessageStatus,
    pub to: MessageStatus,
    /// Whether the status actually moved.
    pub changed: bool,
}

/// State machine for one conversation turn.
pub struct TurnMachine {
    turn: Turn,
    final_discipline: FinalDiscipline,
    reasoning_seen: bool,
}

impl TurnMachine {
    /// Machine with the default [`FinalDiscipline::DeferToClose`] rule.
    pub fn new(turn: Turn) -> Self {
        Self::with_discipline(turn, FinalDiscipline::default())
    }

    pub fn with_discipline(turn: Turn, final_discipline: FinalDiscipline) -> Self {
        Self {
            turn,
            final_discipline,
            reasoning_seen: false,
        }
    }

    pub fn status(&self) -> MessageStatus {
        self.turn.assistant.status
    }

    pub fn turn(&self) -> &Turn {
        &self.turn
    }

    pub fn into_turn(self) -> Turn {
        self.turn
    }

    /// Apply one event in arrival order.
    ///
    /// Events reaching a terminal reply are ignored and reported as
    /// unchanged transitions.
    pub fn handle_event(&mut self, event: TurnEvent) -> StateTransition {
        let from = self.turn.assistant.status;
        if from.is_terminal() {
            debug!("Turn {} is terminal, dropping {event:?}", self.turn.id);
            return StateTransition {
                from,
                to: from,
                changed: false,
            };
        }

        let to = match event {
            TurnEvent::Protocol(ProtocolEvent::Reasoning { token }) => {
                if !self.reasoning_seen {
                    self.reasoning_seen = true;
                    // Drop stale partial content while the reply is thinking.
                    self.turn.assistant.content.clear();
                }
                let token = sanitize(&token);
                self.turn
                    .assistant
                    .reasoning_content
                    .get_or_insert_with(String::new)
                    .push_str(&token);
                MessageStatus::Reasoning
            }
            TurnEvent::Protocol(ProtocolEvent::ContentDelta { text }) => {
                self.turn.assistant.content.push_str(&sanitize(&text));
                MessageStatus::Streaming
            }
            TurnEvent::Protocol(ProtocolEvent::Final { text }) => {
                // Authoritative: replaces whatever the deltas accumulated.
                self.turn.assistant.content = sanitize(&text);
                match self.final_discipline {
                    FinalDiscipline::DeferToClose => MessageStatus::Streaming,
                    FinalDiscipline::ImmediateDone => MessageStatus::Done,
                }
            }
            TurnEvent::Protocol(ProtocolEvent::Unparsable { raw }) => {
                debug!("Turn {} ignoring unparsable line: {raw}", self.turn.id);
                from
            }
            TurnEvent::StreamClosed => MessageStatus::Done,
            TurnEvent::Cancelled => MessageStatus::Abort,
            TurnEvent::Failed => {
                self.turn.assistant.content = FAILURE_MESSAGE.to_string();
                MessageStatus::Error
            }
        };

        self.turn.assistant.status = to;
        let changed = from != to;
        if changed {
            debug!("Turn {}: {from:?} -> {to:?}", self.turn.id);
        }
        StateTransition { from, to, changed }
    }
}
