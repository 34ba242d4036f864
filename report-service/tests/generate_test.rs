//! `/generate` endpoint integration tests.

mod common;

use common::{test_config, TestApp};
use report_service::services::providers::mock::MockTextProvider;
use report_service::services::providers::ProviderError;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn generate_returns_report() {
    let provider = Arc::new(MockTextProvider::replying("안녕하세요. 리포트입니다."));
    let app = TestApp::spawn(provider.clone()).await;

    let response = app
        .post_generate(&json!({
            "name": "민수",
            "className": "A",
            "teacherName": "박지현",
            "score": 85,
            "base": 100,
            "attendance": "정상",
            "dateStr": "05월 09일"
        }))
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "report": "안녕하세요. 리포트입니다." }));

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    let system = calls[0].system.as_deref().unwrap();
    assert!(system.contains(
        "안녕하세요. A반 민수학생을 지도하고 있는 고수학 학원 박지현 선생님 입니다. 05월 09일 데일리 리포트 입니다."
    ));
    assert!(system.contains("85점 (100점 만점 기준)"));
}

#[tokio::test]
async fn absent_student_prompt_carries_not_taken_line() {
    let provider = Arc::new(MockTextProvider::replying("ok"));
    let app = TestApp::spawn(provider.clone()).await;

    let response = app
        .post_generate(&json!({ "name": "민수", "className": "A", "attendance": "결석" }))
        .await;

    assert_eq!(response.status(), 200);
    assert!(provider.calls()[0]
        .prompt
        .contains("※ 테스트 미응시: 결석"));
}

#[tokio::test]
async fn missing_required_field_is_bad_request() {
    let provider = Arc::new(MockTextProvider::replying("unused"));
    let app = TestApp::spawn(provider.clone()).await;

    let response = app.post_generate(&json!({ "name": "민수" })).await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert!(body["report"].as_str().unwrap().starts_with("⚠️"));
    assert!(body["report"].as_str().unwrap().contains("className"));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::replying("unused"))).await;

    let response = app
        .client()
        .post(format!("{}/generate", app.address))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn upstream_status_is_propagated() {
    let provider = Arc::new(MockTextProvider::failing(ProviderError::Http {
        status: 429,
        message: "Too Many Requests rate limited".to_string(),
    }));
    let app = TestApp::spawn(provider).await;

    let response = app
        .post_generate(&json!({ "name": "민수", "className": "A" }))
        .await;

    assert_eq!(response.status(), 429);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "upstream_http_error");
    assert_eq!(
        body["report"],
        "⚠️ Mock 호출 실패: HTTP 429 Too Many Requests rate limited"
    );
}

#[tokio::test]
async fn missing_credential_is_configuration_error() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::unconfigured())).await;

    let response = app
        .post_generate(&json!({ "name": "민수", "className": "A" }))
        .await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "configuration_error");
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let config = test_config(&[("UPSTREAM_TIMEOUT_SECS", "1")]);
    let provider = Arc::new(MockTextProvider::stalling(Duration::from_secs(10)));
    let app = TestApp::spawn_with_config(config, provider).await;

    let response = app
        .post_generate(&json!({ "name": "민수", "className": "A" }))
        .await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "upstream_timeout");
    assert_eq!(body["report"], "⚠️ 서버 내부 오류: 요청 시간 초과");
}

#[tokio::test]
async fn failed_request_does_not_affect_the_next() {
    let provider = Arc::new(MockTextProvider::replying("ok"));
    let app = TestApp::spawn(provider).await;

    let bad = app.post_generate(&json!({})).await;
    assert_eq!(bad.status(), 400);

    let good = app
        .post_generate(&json!({ "name": "민수", "className": "A" }))
        .await;
    assert_eq!(good.status(), 200);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::replying("ok"))).await;

    let response = app
        .client()
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/generate", app.address),
        )
        .header("origin", "https://academy.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::replying("ok"))).await;

    let response = app
        .client()
        .post(format!("{}/generate", app.address))
        .header("origin", "https://academy.example")
        .header("x-request-id", "req-42")
        .json(&json!({ "name": "민수", "className": "A" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
