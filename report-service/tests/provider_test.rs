//! HTTP adapter tests against local stand-in provider servers.

use report_service::services::providers::gemini::GeminiTextProvider;
use report_service::services::providers::openai::OpenAiTextProvider;
use report_service::services::providers::{
    GenerationParams, ProviderConfig, ProviderError, TextProvider,
};
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(api_base: String, model: &str) -> ProviderConfig {
    ProviderConfig {
        api_key: Some("test-key".to_string()),
        model: model.to_string(),
        api_base,
        timeout: Duration::from_secs(5),
    }
}

/// Accepts connections and never answers.
async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn openai_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "messages": [
                { "role": "system", "content": "persona" },
                { "role": "user", "content": "data" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "리포트 본문" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiTextProvider::new(config(server.uri(), "gpt-4o"));
    let text = provider
        .generate(Some("persona"), "data", &GenerationParams::default())
        .await
        .unwrap();

    assert_eq!(text, "리포트 본문");
}

#[tokio::test]
async fn openai_error_status_is_kept_with_truncated_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("x".repeat(1000)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiTextProvider::new(config(server.uri(), "gpt-4o"));
    let err = provider
        .generate(None, "data", &GenerationParams::default())
        .await
        .unwrap_err();

    match err {
        ProviderError::Http { status, message } => {
            assert_eq!(status, 429);
            assert!(message.starts_with("Too Many Requests "));
            assert_eq!(message.matches('x').count(), 200);
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn openai_success_without_content_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "chatcmpl-1", "choices": [] })),
        )
        .mount(&server)
        .await;

    let provider = OpenAiTextProvider::new(config(server.uri(), "gpt-4o"));
    let err = provider
        .generate(None, "data", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

#[tokio::test]
async fn openai_client_timeout_is_classified() {
    let mut cfg = config(silent_server().await, "gpt-4o");
    cfg.timeout = Duration::from_millis(200);

    let provider = OpenAiTextProvider::new(cfg);
    let err = provider
        .generate(None, "data", &GenerationParams::default())
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::Timeout);
}

#[tokio::test]
async fn unreachable_provider_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = OpenAiTextProvider::new(config(format!("http://{}", addr), "gpt-4o"));
    let err = provider
        .generate(None, "data", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Network(_)));
}

#[tokio::test]
async fn gemini_returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "persona" }] },
            "contents": [{ "role": "user", "parts": [{ "text": "data" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "제미나이 리포트" }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiTextProvider::new(config(server.uri(), "gemini-2.0-flash"));
    let text = provider
        .generate(Some("persona"), "data", &GenerationParams::default())
        .await
        .unwrap();

    assert_eq!(text, "제미나이 리포트");
}

#[tokio::test]
async fn gemini_blocked_response_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "promptFeedback": { "blockReason": "SAFETY" } })),
        )
        .mount(&server)
        .await;

    let provider = GeminiTextProvider::new(config(server.uri(), "gemini-2.0-flash"));
    let err = provider
        .generate(None, "data", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

#[tokio::test]
async fn gemini_server_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(503).set_body_string(r#"{"error":{"message":"overloaded"}}"#))
        .mount(&server)
        .await;

    let provider = GeminiTextProvider::new(config(server.uri(), "gemini-2.0-flash"));
    let err = provider
        .generate(None, "data", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Http { status: 503, .. }));
}

#[tokio::test]
async fn missing_key_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut cfg = config(server.uri(), "gpt-4o");
    cfg.api_key = None;
    let provider = OpenAiTextProvider::new(cfg);

    assert!(provider.ensure_configured().is_err());
    let err = provider
        .generate(None, "data", &GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::NotConfigured(_)));
}
