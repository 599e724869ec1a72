//! Endpoint and audio configuration.
//!
//! Defaults are hard-coded and can be overridden from the environment in
//! [`ChatConfig::new`] / [`AudioConfig::new`]; nothing here is ambient
//! global state, callers construct a config and pass it down.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_REASONING_URL: &str = "https://qp.zjich.cn/ffserver/chatStream/q";
const DEFAULT_PLAIN_URL: &str = "https://qp.zjich.cn/ffserver/chat/q";

const DEFAULT_TRANSCRIPTION_URL: &str = "https://api.siliconflow.cn/v1/audio/transcriptions";
const DEFAULT_TRANSCRIPTION_MODEL: &str = "FunAudioLLM/SenseVoiceSmall";

/// Audio formats the transcription endpoint accepts.
pub const SUPPORTED_FORMATS: &[&str] = &["wav", "mp3", "pcm", "opus", "webm"];

/// File extension for a declared media type, per the fixed mapping table.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "audio/wav" => Some("wav"),
        "audio/mp3" | "audio/mpeg" => Some("mp3"),
        "audio/pcm" => Some("pcm"),
        "audio/opus" => Some("opus"),
        "audio/webm" => Some("webm"),
        _ => None,
    }
}

/// Configuration for the streaming chat endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Reasoning-capable streaming endpoint.
    pub reasoning_url: String,
    /// Plain streaming endpoint (no reasoning trace).
    pub plain_url: String,
    /// Optional bearer token attached to chat requests.
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reasoning_url: DEFAULT_REASONING_URL.to_string(),
            plain_url: DEFAULT_PLAIN_URL.to_string(),
            auth_token: None,
        }
    }
}

impl ChatConfig {
    /// Defaults overridden by `CHAT_REASONING_URL`, `CHAT_PLAIN_URL` and
    /// `CHAT_AUTH_TOKEN`.
    pub fn new() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("CHAT_REASONING_URL") {
            config.reasoning_url = url;
        }
        if let Ok(url) = std::env::var("CHAT_PLAIN_URL") {
            config.plain_url = url;
        }
        if let Ok(token) = std::env::var("CHAT_AUTH_TOKEN") {
            config.auth_token = Some(token);
        }
        config
    }
}

/// Configuration for the transcription upload call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub api_url: String,
    pub model: String,
    /// Largest accepted payload, in bytes.
    pub max_file_size: usize,
    /// Longest accepted recording, in milliseconds.
    pub max_recording_ms: u64,
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_TRANSCRIPTION_URL.to_string(),
            model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            max_file_size: 10 * 1024 * 1024,
            max_recording_ms: 60_000,
            max_retries: 3,
            retry_delay_ms: 1_000,
        }
    }
}

impl AudioConfig {
    /// Defaults overridden by `TRANSCRIBE_API_URL` and `TRANSCRIBE_MODEL`.
    pub fn new() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("TRANSCRIBE_API_URL") {
            config.api_url = url;
        }
        if let Ok(model) = std::env::var("TRANSCRIBE_MODEL") {
            config.model = model;
        }
        config
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_mapping_covers_supported_formats() {
        for (mime, ext) in [
            ("audio/wav", "wav"),
            ("audio/mp3", "mp3"),
            ("audio/mpeg", "mp3"),
            ("audio/pcm", "pcm"),
            ("audio/opus", "opus"),
            ("audio/webm", "webm"),
        ] {
            assert_eq!(extension_for_mime(mime), Some(ext));
            assert!(SUPPORTED_FORMATS.contains(&ext));
        }
    }

    #[test]
    fn unknown_mime_has_no_extension() {
        assert_eq!(extension_for_mime("audio/flac"), None);
        assert_eq!(extension_for_mime("text/plain"), None);
    }

    #[test]
    fn audio_defaults() {
        let config = AudioConfig::default();
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay(), Duration::from_millis(1_000));
    }
}
