//! Incremental decoder for the newline-delimited event stream.
//!
//! The wire format is one `data:`-prefixed JSON payload per line with no
//! end-of-stream sentinel; the connection closing is the only completion
//! signal. Chunk boundaries fall anywhere, so the decoder keeps the
//! pending bytes of an unfinished line (and of a split UTF-8 sequence)
//! between feeds.

use chat_state::ProtocolEvent;
use log::debug;

use super::payload::PayloadShape;

/// Stateful, non-restartable decoder. The session feeds it response body
/// chunks and applies the returned events in order.
pub struct StreamDecoder {
    shape: PayloadShape,
    pending: Vec<u8>,
}

impl StreamDecoder {
    pub fn new(shape: PayloadShape) -> Self {
        Self {
            shape,
            pending: Vec::new(),
        }
    }

    /// Consume one body chunk and return every event completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ProtocolEvent> {
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            self.decode_line(&line, &mut events);
        }
        events
    }

    /// Flush a trailing line the stream closed without terminating.
    pub fn finish(&mut self) -> Vec<ProtocolEvent> {
        let rest = std::mem::take(&mut self.pending);
        let mut events = Vec::new();
        self.decode_line(&rest, &mut events);
        events
    }

    fn decode_line(&self, raw: &[u8], events: &mut Vec<ProtocolEvent>) {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let Some(data) = line.strip_prefix("data:") else {
            debug!("Skipping non-data stream line: {line}");
            return;
        };
        if let Some(event) = self.shape.parse(data.trim()) {
            events.push(event);
        }
    }
}
