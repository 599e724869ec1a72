//! Wire payload shapes for the `data:` lines.
//!
//! The two endpoints speak slightly different dialects: the reasoning
//! endpoint interleaves `reasoning`/`final` payloads, the plain endpoint
//! sends `stream`/`final`. The session picks the shape when it picks the
//! endpoint.

use chat_state::ProtocolEvent;
use log::warn;
use serde::Deserialize;

/// Payload dialect spoken by the targeted endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{"type":"reasoning","token":…}` / `{"type":"final","final":…}`
    Reasoning,
    /// `{"type":"stream","content":…}` / `{"type":"final","final":…}`
    Plain,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ReasoningPayload {
    Reasoning {
        token: Option<String>,
    },
    Final {
        #[serde(rename = "final")]
        text: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum PlainPayload {
    Stream {
        content: Option<String>,
    },
    Final {
        #[serde(rename = "final")]
        text: Option<String>,
    },
}

impl PayloadShape {
    /// Map one `data:` payload to a protocol event.
    ///
    /// Payloads whose value field is missing or empty yield nothing, the
    /// way the endpoints occasionally send keep-alive shells. Lines that
    /// fail to parse become [`ProtocolEvent::Unparsable`]; one bad line
    /// never aborts the stream.
    pub fn parse(&self, data: &str) -> Option<ProtocolEvent> {
        match self {
            Self::Reasoning => match serde_json::from_str::<ReasoningPayload>(data) {
                Ok(ReasoningPayload::Reasoning { token: Some(token) }) if !token.is_empty() => {
                    Some(ProtocolEvent::Reasoning { token })
                }
                Ok(ReasoningPayload::Final { text: Some(text) }) if !text.is_empty() => {
                    Some(ProtocolEvent::Final { text })
                }
                Ok(_) => None,
                Err(e) => Some(unparsable(data, e)),
            },
            Self::Plain => match serde_json::from_str::<PlainPayload>(data) {
                Ok(PlainPayload::Stream {
                    content: Some(content),
                }) if !content.is_empty() => Some(ProtocolEvent::ContentDelta { text: content }),
                Ok(PlainPayload::Final { text: Some(text) }) if !text.is_empty() => {
                    Some(ProtocolEvent::Final { text })
                }
                Ok(_) => None,
                Err(e) => Some(unparsable(data, e)),
            },
        }
    }
}

fn unparsable(data: &str, error: serde_json::Error) -> ProtocolEvent {
    warn!("Failed to parse stream payload: {error}, data: {data}");
    ProtocolEvent::Unparsable {
        raw: data.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasoning_shape_parses_reasoning_token() {
        let event = PayloadShape::Reasoning
            .parse(r#"{"type":"reasoning","token":"A"}"#)
            .unwrap();
        assert_eq!(
            event,
            ProtocolEvent::Reasoning {
                token: "A".to_string()
            }
        );
    }

    #[test]
    fn reasoning_shape_parses_final() {
        let event = PayloadShape::Reasoning
            .parse(r#"{"type":"final","final":"B"}"#)
            .unwrap();
        assert_eq!(
            event,
            ProtocolEvent::Final {
                text: "B".to_string()
            }
        );
    }

    #[test]
    fn plain_shape_parses_content_delta() {
        let event = PayloadShape::Plain
            .parse(r#"{"type":"stream","content":"chunk"}"#)
            .unwrap();
        assert_eq!(
            event,
            ProtocolEvent::ContentDelta {
                text: "chunk".to_string()
            }
        );
    }

    #[test]
    fn plain_shape_parses_final() {
        let event = PayloadShape::Plain
            .parse(r#"{"type":"final","final":"answer"}"#)
            .unwrap();
        assert_eq!(
            event,
            ProtocolEvent::Final {
                text: "answer".to_string()
            }
        );
    }

    #[test]
    fn missing_value_field_yields_nothing() {
        assert!(PayloadShape::Reasoning
            .parse(r#"{"type":"reasoning"}"#)
            .is_none());
        assert!(PayloadShape::Reasoning
            .parse(r#"{"type":"reasoning","token":""}"#)
            .is_none());
        assert!(PayloadShape::Plain.parse(r#"{"type":"final"}"#).is_none());
    }

    #[test]
    fn malformed_json_is_unparsable() {
        let event = PayloadShape::Reasoning.parse("{not json").unwrap();
        assert!(matches!(event, ProtocolEvent::Unparsable { .. }));
    }

    #[test]
    fn unknown_discriminant_is_unparsable() {
        let event = PayloadShape::Plain
            .parse(r#"{"type":"heartbeat"}"#)
            .unwrap();
        assert!(matches!(event, ProtocolEvent::Unparsable { .. }));
    }

    #[test]
    fn shapes_do_not_cross_parse() {
        // A plain payload fed to the reasoning shape has an unknown tag.
        let event = PayloadShape::Reasoning
            .parse(r#"{"type":"stream","content":"x"}"#)
            .unwrap();
        assert!(matches!(event, ProtocolEvent::Unparsable { .. }));
    }
}
