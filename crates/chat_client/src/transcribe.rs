//! Transcription upload client.
//!
//! Validates the recording before any network attempt, then submits it as
//! a multipart form under the fixed-delay retry policy, classifying
//! failures by status.

use chat_core::config::{extension_for_mime, AudioConfig, SUPPORTED_FORMATS};
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{ClientError, Result};
use crate::retry::with_retry;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the audio transcription endpoint.
pub struct TranscriptionClient {
    http: reqwest::Client,
    config: AudioConfig,
    api_token: String,
}

impl TranscriptionClient {
    pub fn new(config: AudioConfig, api_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            api_token: api_token.into(),
        }
    }

    /// Submit a recording and return the transcribed text.
    ///
    /// Validation failures are terminal: no request is made and no retry
    /// happens. Network and classification failures are retried under the
    /// configured fixed-delay policy.
    pub async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String> {
        let extension = self.validate(audio, mime_type)?;
        debug!(
            "Submitting {} byte recording as recording.{extension}",
            audio.len()
        );

        let text = with_retry(
            || self.attempt(audio, mime_type, extension),
            self.config.max_retries,
            self.config.retry_delay(),
        )
        .await?;

        info!("Transcription completed, {} chars", text.len());
        Ok(text)
    }

    /// Pre-flight size and format checks.
    fn validate(&self, audio: &[u8], mime_type: &str) -> Result<&'static str> {
        if audio.len() > self.config.max_file_size {
            return Err(ClientError::Validation(format!(
                "audio file too large: {} bytes exceeds the {} byte limit",
                audio.len(),
                self.config.max_file_size
            )));
        }
        let extension = extension_for_mime(mime_type).ok_or_else(|| {
            ClientError::Validation(format!("unsupported audio media type: {mime_type}"))
        })?;
        if !SUPPORTED_FORMATS.contains(&extension) {
            return Err(ClientError::Validation(format!(
                "unsupported audio format: {extension}"
            )));
        }
        Ok(extension)
    }

    async fn attempt(&self, audio: &[u8], mime_type: &str, extension: &str) -> Result<String> {
        let part = Part::bytes(audio.to_vec())
            .file_name(format!("recording.{extension}"))
            .mime_str(mime_type)
            .map_err(|e| ClientError::Unknown(format!("invalid media type header: {e}")))?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.config.model.clone());

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.api_token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, body));
        }

        let body: TranscriptionResponse = response.json().await?;
        Ok(body.text.trim().to_string())
    }
}

/// Map a non-success response to an error kind.
fn classify_failure(status: StatusCode, body: String) -> ClientError {
    if status == StatusCode::UNAUTHORIZED {
        return ClientError::Auth;
    }
    if status.is_server_error() {
        return ClientError::Server {
            status: status.as_u16(),
        };
    }
    // Surface the endpoint's structured message when there is one, then the
    // raw body, then a generic fallback.
    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => ClientError::Unknown(parsed.message),
        Err(_) if !body.trim().is_empty() => ClientError::Unknown(body),
        Err(_) => ClientError::Unknown("transcription request failed".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_unauthorized() {
        let error = classify_failure(StatusCode::UNAUTHORIZED, String::new());
        assert!(matches!(error, ClientError::Auth));
    }

    #[test]
    fn classify_server_errors() {
        let error = classify_failure(StatusCode::BAD_GATEWAY, String::new());
        assert!(matches!(error, ClientError::Server { status: 502 }));
    }

    #[test]
    fn classify_prefers_structured_message() {
        let error = classify_failure(
            StatusCode::BAD_REQUEST,
            r#"{"message":"model not available"}"#.to_string(),
        );
        match error {
            ClientError::Unknown(message) => assert_eq!(message, "model not available"),
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn classify_falls_back_to_raw_body() {
        let error = classify_failure(StatusCode::BAD_REQUEST, "plain failure text".to_string());
        match error {
            ClientError::Unknown(message) => assert_eq!(message, "plain failure text"),
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn classify_falls_back_to_generic_message() {
        let error = classify_failure(StatusCode::BAD_REQUEST, "  ".to_string());
        match error {
            ClientError::Unknown(message) => assert_eq!(message, "transcription request failed"),
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_oversized_audio() {
        let client = TranscriptionClient::new(
            AudioConfig {
                max_file_size: 4,
                ..AudioConfig::default()
            },
            "token",
        );
        let error = client.validate(&[0u8; 5], "audio/wav").unwrap_err();
        assert!(matches!(error, ClientError::Validation(_)));
    }

    #[test]
    fn validate_rejects_unknown_media_type() {
        let client = TranscriptionClient::new(AudioConfig::default(), "token");
        let error = client.validate(&[0u8; 4], "audio/flac").unwrap_err();
        assert!(matches!(error, ClientError::Validation(_)));
    }

    #[test]
    fn validate_maps_mpeg_to_mp3() {
        let client = TranscriptionClient::new(AudioConfig::default(), "token");
        assert_eq!(client.validate(&[0u8; 4], "audio/mpeg").unwrap(), "mp3");
    }
}
