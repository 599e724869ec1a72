//! Events that drive the turn state machine.

use serde::{Deserialize, Serialize};

/// A typed event decoded from the server-push stream.
///
/// Produced by the stream decoder only; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolEvent {
    /// A reasoning-trace token.
    Reasoning { token: String },
    /// An incremental piece of answer content.
    ContentDelta { text: String },
    /// The authoritative final answer, superseding accumulated deltas.
    Final { text: String },
    /// A line that failed structured parsing; carried for logging only.
    Unparsable { raw: String },
}

/// Everything that can move a turn's assistant reply forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// A decoded stream event, applied in arrival order.
    Protocol(ProtocolEvent),
    /// The response body ended without error.
    StreamClosed,
    /// The user cancelled the exchange.
    Cancelled,
    /// The exchange failed for any non-cancellation reason.
    Failed,
}

impl TurnEvent {
    /// Events that end the turn regardless of what arrives afterwards.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::StreamClosed | Self::Cancelled | Self::Failed)
    }
}
