//! The interaction session: one cancellable streaming exchange at a time.

use std::sync::{Arc, Mutex};

use chat_core::config::ChatConfig;
use chat_core::history::ChatHistory;
use chat_core::message::Turn;
use chat_state::{FinalDiscipline, TurnEvent, TurnMachine};
use futures_util::StreamExt;
use log::{info, warn};
use reqwest::header::ACCEPT;
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, Result};
use crate::prompt::shape_outbound;
use crate::stream::{PayloadShape, StreamDecoder};

/// Which endpoint an exchange targets.
///
/// One session type parameterized by variant: the endpoint selects the
/// URL, the decoder payload shape, whether the auth token is attached and
/// whether outbound prompt shaping applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Streams a reasoning trace before the final answer.
    Reasoning,
    /// Streams answer deltas only; outbound text is shaped first.
    Plain,
}

impl Endpoint {
    fn payload_shape(&self) -> PayloadShape {
        match self {
            Self::Reasoning => PayloadShape::Reasoning,
            Self::Plain => PayloadShape::Plain,
        }
    }

    fn url<'a>(&self, config: &'a ChatConfig) -> &'a str {
        match self {
            Self::Reasoning => &config.reasoning_url,
            Self::Plain => &config.plain_url,
        }
    }

    /// Only the plain endpoint expects the authorization header.
    fn wants_auth(&self) -> bool {
        matches!(self, Self::Plain)
    }
}

/// Clonable handle that cancels the exchange currently in flight.
///
/// `cancel` is idempotent and safe to call when nothing is in flight; a
/// new exchange arms a fresh token, so stale cancellations never leak
/// into it.
#[derive(Clone)]
pub struct CancelHandle {
    current: Arc<Mutex<CancellationToken>>,
}

impl CancelHandle {
    fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    pub fn cancel(&self) {
        self.current.lock().expect("cancel handle lock").cancel();
    }

    fn arm(&self) -> CancellationToken {
        let fresh = CancellationToken::new();
        *self.current.lock().expect("cancel handle lock") = fresh.clone();
        fresh
    }
}

/// Drives request/response exchanges against one chat endpoint.
pub struct ChatSession {
    http: reqwest::Client,
    config: ChatConfig,
    endpoint: Endpoint,
    final_discipline: FinalDiscipline,
    history: ChatHistory,
    cancel: CancelHandle,
}

impl ChatSession {
    pub fn new(config: ChatConfig, endpoint: Endpoint, history: ChatHistory) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            endpoint,
            final_discipline: FinalDiscipline::default(),
            history,
            cancel: CancelHandle::new(),
        }
    }

    /// Override how a `final` event finishes the reply.
    pub fn with_final_discipline(mut self, discipline: FinalDiscipline) -> Self {
        self.final_discipline = discipline;
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// For the user actions outside an exchange: clearing, toggling
    /// retention.
    pub fn history_mut(&mut self) -> &mut ChatHistory {
        &mut self.history
    }

    /// Run one full exchange: dispatch the question, drive the reply's
    /// state machine from the decoded stream and commit the turn to
    /// history.
    ///
    /// Taking `&mut self` keeps a session to one exchange in flight;
    /// starting the next one never implicitly cancels a previous one.
    /// Cancellation ends the turn in `abort` and is not an error. Any
    /// failure ends it in `error` and is returned after the transition;
    /// the turn is committed in every outcome.
    pub async fn send_message(&mut self, text: &str) -> Result<&Turn> {
        let outbound = match self.endpoint {
            Endpoint::Plain => shape_outbound(text),
            Endpoint::Reasoning => text.to_string(),
        };

        let turn = Turn::new(self.history.next_turn_id(), text);
        let mut machine = TurnMachine::with_discipline(turn, self.final_discipline);
        let token = self.cancel.arm();

        let outcome = self.drive_exchange(&mut machine, &token, &outbound).await;
        if let Err(error) = &outcome {
            if error.is_cancellation() {
                info!("Exchange cancelled by user");
            } else {
                warn!("Exchange failed: {error}");
            }
        }

        let turn = self.history.push(machine.into_turn());
        match outcome {
            // Cancellation surfaces as the abort status, not as an error.
            Ok(()) | Err(ClientError::Cancelled) => Ok(turn),
            Err(error) => Err(error),
        }
    }

    async fn drive_exchange(
        &self,
        machine: &mut TurnMachine,
        token: &CancellationToken,
        outbound: &str,
    ) -> Result<()> {
        let url = self.endpoint.url(&self.config);
        let mut request = self
            .http
            .post(url)
            .header(ACCEPT, "text/event-stream")
            .form(&[("ques", outbound)]);
        if self.endpoint.wants_auth() {
            if let Some(auth) = &self.config.auth_token {
                request = request.bearer_auth(auth);
            }
        }

        info!("Dispatching chat exchange to {url}");
        let response = tokio::select! {
            _ = token.cancelled() => {
                machine.handle_event(TurnEvent::Cancelled);
                return Err(ClientError::Cancelled);
            }
            response = request.send() => response,
        };

        let response = match response {
            Ok(response) => response,
            Err(error) => {
                machine.handle_event(TurnEvent::Failed);
                return Err(ClientError::Transport(error));
            }
        };

        let status = response.status();
        if !status.is_success() {
            machine.handle_event(TurnEvent::Failed);
            return Err(ClientError::Unknown(format!(
                "chat endpoint answered with status {status}"
            )));
        }

        let mut decoder = StreamDecoder::new(self.endpoint.payload_shape());
        let mut body = response.bytes_stream();
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    machine.handle_event(TurnEvent::Cancelled);
                    return Err(ClientError::Cancelled);
                }
                chunk = body.next() => match chunk {
                    Some(Ok(bytes)) => {
                        for event in decoder.feed(&bytes) {
                            machine.handle_event(TurnEvent::Protocol(event));
                        }
                    }
                    Some(Err(error)) => {
                        machine.handle_event(TurnEvent::Failed);
                        return Err(ClientError::Transport(error));
                    }
                    None => {
                        for event in decoder.finish() {
                            machine.handle_event(TurnEvent::Protocol(event));
                        }
                        machine.handle_event(TurnEvent::StreamClosed);
                        return Ok(());
                    }
                }
            }
        }
    }
}
