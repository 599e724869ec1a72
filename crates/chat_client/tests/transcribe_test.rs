//! Integration tests for the transcription upload: validation, retry and
//! failure classification.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chat_client::{ClientError, TranscriptionClient};
use chat_core::config::AudioConfig;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config_for(server: &MockServer) -> AudioConfig {
    AudioConfig {
        api_url: format!("{}/v1/audio/transcriptions", server.uri()),
        max_retries: 2,
        retry_delay_ms: 10,
        ..AudioConfig::default()
    }
}

#[tokio::test]
async fn successful_transcription_returns_trimmed_text() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": "  hello world \n"
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = TranscriptionClient::new(config_for(&server), "secret");
    let text = client
        .transcribe(&[0u8; 128], "audio/wav")
        .await
        .expect("transcription");
    assert_eq!(text, "hello world");
}

#[tokio::test]
async fn server_failure_is_retried_until_it_recovers() {
    init_logging();
    let server = MockServer::start().await;
    let request_count = Arc::new(AtomicUsize::new(0));
    let counter = request_count.clone();

    // Fails twice with 500, then succeeds.
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(move |_req: &wiremock::Request| {
            let count = counter.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                ResponseTemplate::new(500).set_body_string("boom")
            } else {
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "ok"}))
            }
        })
        .expect(3)
        .mount(&server)
        .await;

    let client = TranscriptionClient::new(config_for(&server), "secret");
    let text = client
        .transcribe(&[0u8; 128], "audio/mp3")
        .await
        .expect("transcription after retries");
    assert_eq!(text, "ok");
    assert_eq!(request_count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausted_retries_surface_the_last_failure() {
    init_logging();
    let server = MockServer::start().await;

    // Always 401: with max_retries = 2 that is exactly 3 attempts.
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"unauthorized"}"#))
        .expect(3)
        .mount(&server)
        .await;

    let client = TranscriptionClient::new(config_for(&server), "bad-token");
    let error = client.transcribe(&[0u8; 128], "audio/wav").await.unwrap_err();
    assert!(matches!(error, ClientError::Auth));
}

#[tokio::test]
async fn client_failure_surfaces_the_body_message() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"message":"audio too short to transcribe"}"#),
        )
        .expect(3)
        .mount(&server)
        .await;

    let client = TranscriptionClient::new(config_for(&server), "secret");
    let error = client.transcribe(&[0u8; 128], "audio/webm").await.unwrap_err();
    match error {
        ClientError::Unknown(message) => assert_eq!(message, "audio too short to transcribe"),
        other => panic!("expected Unknown, got {other:?}"),
    }
}

#[tokio::test]
async fn oversized_audio_never_reaches_the_network() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = AudioConfig {
        max_file_size: 64,
        ..config_for(&server)
    };
    let client = TranscriptionClient::new(config, "secret");
    let error = client.transcribe(&[0u8; 65], "audio/wav").await.unwrap_err();
    assert!(matches!(error, ClientError::Validation(_)));
}

#[tokio::test]
async fn unknown_media_type_never_reaches_the_network() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = TranscriptionClient::new(config_for(&server), "secret");
    let error = client
        .transcribe(&[0u8; 128], "audio/x-unknown")
        .await
        .unwrap_err();
    assert!(matches!(error, ClientError::Validation(_)));
}
