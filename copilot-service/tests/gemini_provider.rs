//! Gemini provider against a local stand-in for the `generateContent` API.

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use copilot_service::config::{Binding, CopilotConfig};
use copilot_service::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use copilot_service::services::providers::{FinishReason, ProviderError, TextProvider};
use copilot_service::startup::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config;
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpListener;

const API_KEY: &str = "test-key";
const MODEL: &str = "gemini-2.0-flash-exp";

/// Serve `reply` for every generateContent call and return the API base URL.
async fn spawn_stub(status: StatusCode, reply: Value) -> String {
    let handler = move |Path(call): Path<String>, headers: HeaderMap, Json(body): Json<Value>| {
        let reply = reply.clone();
        async move {
            if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
                return (StatusCode::FORBIDDEN, Json(json!({ "error": "bad key" })))
                    .into_response();
            }
            if call != format!("{}:generateContent", MODEL) {
                return (StatusCode::NOT_FOUND, Json(json!({ "error": call }))).into_response();
            }
            if body["contents"][0]["parts"][0]["text"].as_str().is_none() {
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": "no prompt" })))
                    .into_response();
            }
            (status, Json(reply)).into_response()
        }
    };

    let router = Router::new().route("/v1beta/models/:call", post(handler));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://127.0.0.1:{}/v1beta", port)
}

fn provider(api_base: String) -> GeminiTextProvider {
    GeminiTextProvider::new(GeminiConfig {
        api_key: Secret::new(API_KEY.to_string()),
        model: MODEL.to_string(),
        api_base,
    })
    .unwrap()
}

fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 18 }
    })
}

#[tokio::test]
async fn returns_candidate_text_and_usage() {
    let base = spawn_stub(StatusCode::OK, text_reply("CASE-1 looks like structuring.")).await;

    let response = provider(base).generate("Summarize CASE-1").await.unwrap();

    assert_eq!(response.text, "CASE-1 looks like structuring.");
    assert_eq!(response.input_tokens, 120);
    assert_eq!(response.output_tokens, 18);
}

#[tokio::test]
async fn joins_multiple_parts() {
    let reply = json!({
        "candidates": [{
            "content": { "parts": [{ "text": "first " }, { "text": "second" }] }
        }]
    });
    let base = spawn_stub(StatusCode::OK, reply).await;

    let response = provider(base).generate("q").await.unwrap();
    assert_eq!(response.text, "first second");
    assert_eq!(response.input_tokens, 0);
}

#[tokio::test]
async fn token_limit_stop_keeps_partial_text() {
    let reply = json!({
        "candidates": [{
            "content": { "parts": [{ "text": "CASE-1 shows" }] },
            "finishReason": "MAX_TOKENS"
        }]
    });
    let base = spawn_stub(StatusCode::OK, reply).await;

    let response = provider(base).generate("q").await.unwrap();
    assert_eq!(response.text, "CASE-1 shows");
    assert_eq!(response.finish_reason, FinishReason::Length);
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
    let base = spawn_stub(StatusCode::TOO_MANY_REQUESTS, json!({ "error": "quota" })).await;

    let err = provider(base).generate("q").await.unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited));
}

#[tokio::test]
async fn server_error_is_an_api_error() {
    let base = spawn_stub(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "boom" })).await;

    let err = provider(base).generate("q").await.unwrap_err();
    match err {
        ProviderError::ApiError(message) => assert!(message.contains("500")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn wrong_key_is_an_api_error() {
    let base = spawn_stub(StatusCode::OK, text_reply("unused")).await;
    let provider = GeminiTextProvider::new(GeminiConfig {
        api_key: Secret::new("other-key".to_string()),
        model: MODEL.to_string(),
        api_base: base,
    })
    .unwrap();

    let err = provider.generate("q").await.unwrap_err();
    assert!(matches!(err, ProviderError::ApiError(_)));
}

#[tokio::test]
async fn no_candidates_is_an_empty_response() {
    let base = spawn_stub(StatusCode::OK, json!({ "candidates": [] })).await;

    let err = provider(base).generate("q").await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse));
}

#[tokio::test]
async fn safety_stop_is_content_filtered() {
    let reply = json!({ "candidates": [{ "finishReason": "SAFETY" }] });
    let base = spawn_stub(StatusCode::OK, reply).await;

    let err = provider(base).generate("q").await.unwrap_err();
    assert!(matches!(err, ProviderError::ContentFiltered));
}

#[tokio::test]
async fn server_relays_model_answer_end_to_end() {
    let base = spawn_stub(
        StatusCode::OK,
        text_reply("CASE-2024-001 needs escalation; CASE-2024-003 can wait."),
    )
    .await;
    let vars = HashMap::from([
        ("GOOGLE_API_KEY".to_string(), API_KEY.to_string()),
        ("GENAI_API_BASE".to_string(), base),
    ]);
    let common = Config {
        port: 0,
        ..Config::default()
    };
    let config = CopilotConfig::from_lookup(Binding::Server, common, |key| vars.get(key).cloned());

    let app = Application::build(config).await.unwrap();
    let port = app.port();
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let body: Value = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/api/assistant/query", port))
        .json(&json!({
            "query": "Which cases need attention?",
            "cases": [
                { "case_number": "CASE-2024-001" },
                { "case_number": "CASE-2024-002" },
                { "case_number": "CASE-2024-003" }
            ]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body["metadata"],
        json!({
            "caseIds": ["CASE-2024-001", "CASE-2024-003"],
            "model": MODEL,
            "hasContext": false
        })
    );
}
