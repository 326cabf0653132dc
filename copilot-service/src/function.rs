//! Function-as-a-service binding.
//!
//! Translates one platform HTTP event into one HTTP result around the same
//! [`AssistantService`] the server uses. Unlike the server, CORS headers are
//! written explicitly and preflight requests are answered here.

use crate::models::QueryRequest;
use crate::services::AssistantService;
use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::collections::BTreeMap;

/// Incoming HTTP event as delivered by the function platform. Request
/// headers are not needed and are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl FunctionEvent {
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            http_method: "POST".to_string(),
            body: Some(body.into()),
            ..Default::default()
        }
    }
}

/// Result handed back to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl FunctionResponse {
    fn preflight() -> Self {
        let mut headers = cors_headers();
        headers.insert(
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type".to_string(),
        );
        headers.insert(
            "Access-Control-Allow-Methods".to_string(),
            "POST, OPTIONS".to_string(),
        );

        Self {
            status_code: StatusCode::OK.as_u16(),
            headers,
            body: String::new(),
        }
    }

    fn json<T: Serialize>(status: StatusCode, payload: &T) -> Self {
        let mut headers = cors_headers();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        match serde_json::to_string(payload) {
            Ok(body) => Self {
                status_code: status.as_u16(),
                headers,
                body,
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize function response");
                Self {
                    status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    headers,
                    body: r#"{"error":"Internal server error"}"#.to_string(),
                }
            }
        }
    }

    fn error(err: AppError) -> Self {
        Self::json(err.status_code(), &err.body())
    }
}

fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("Access-Control-Allow-Origin".to_string(), "*".to_string())])
}

/// Handle a single invocation. Never fails: every outcome is an HTTP result.
pub async fn handle_event(assistant: &AssistantService, event: FunctionEvent) -> FunctionResponse {
    if event.http_method.eq_ignore_ascii_case("OPTIONS") {
        return FunctionResponse::preflight();
    }

    if !event.http_method.eq_ignore_ascii_case("POST") {
        tracing::warn!(method = %event.http_method, "Rejected non-POST invocation");
        return FunctionResponse::error(AppError::MethodNotAllowed);
    }

    let request = match parse_request(&event) {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!(error = %err, "Rejected function invocation body");
            return FunctionResponse::error(err);
        }
    };

    match assistant.answer(&request).await {
        Ok(response) => FunctionResponse::json(StatusCode::OK, &response),
        Err(err) => FunctionResponse::error(err),
    }
}

fn parse_request(event: &FunctionEvent) -> Result<QueryRequest, AppError> {
    let raw = event
        .body
        .as_deref()
        .ok_or_else(|| AppError::InvalidBody(anyhow::anyhow!("request body is empty")))?;

    let bytes = if event.is_base64_encoded {
        STANDARD
            .decode(raw)
            .map_err(|e| AppError::InvalidBody(anyhow::anyhow!("invalid base64 body: {}", e)))?
    } else {
        raw.as_bytes().to_vec()
    };

    serde_json::from_slice(&bytes).map_err(|e| AppError::InvalidBody(anyhow::Error::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Binding;
    use crate::services::providers::mock::MockTextProvider;
    use crate::services::AssistantSettings;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn service(provider: Arc<MockTextProvider>, api_key_configured: bool) -> AssistantService {
        AssistantService::new(
            provider,
            AssistantSettings {
                model: "gemini-2.0-flash-exp".to_string(),
                api_key_configured,
                binding: Binding::Function,
            },
        )
    }

    fn body(response: &FunctionResponse) -> Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[tokio::test]
    async fn preflight_allows_any_origin() {
        let svc = service(Arc::new(MockTextProvider::replying("unused")), true);
        let event = FunctionEvent {
            http_method: "OPTIONS".to_string(),
            ..Default::default()
        };

        let response = handle_event(&svc, event).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "");
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(response.headers["Access-Control-Allow-Methods"], "POST, OPTIONS");
        assert_eq!(response.headers["Access-Control-Allow-Headers"], "Content-Type");
    }

    #[tokio::test]
    async fn other_methods_are_not_allowed() {
        let svc = service(Arc::new(MockTextProvider::replying("unused")), true);
        let event = FunctionEvent {
            http_method: "GET".to_string(),
            ..Default::default()
        };

        let response = handle_event(&svc, event).await;

        assert_eq!(response.status_code, 405);
        assert_eq!(body(&response), json!({ "error": "Method not allowed" }));
        assert_eq!(response.headers["Content-Type"], "application/json");
    }

    #[tokio::test]
    async fn unparseable_body_is_a_client_error() {
        let provider = Arc::new(MockTextProvider::replying("unused"));
        let svc = service(provider.clone(), true);

        let response = handle_event(&svc, FunctionEvent::post("{not json")).await;

        assert_eq!(response.status_code, 400);
        assert_eq!(body(&response)["error"], "Invalid JSON body");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn missing_body_is_a_client_error() {
        let svc = service(Arc::new(MockTextProvider::replying("unused")), true);
        let event = FunctionEvent {
            http_method: "POST".to_string(),
            ..Default::default()
        };

        let response = handle_event(&svc, event).await;
        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let svc = service(Arc::new(MockTextProvider::replying("unused")), true);

        let response =
            handle_event(&svc, FunctionEvent::post(r#"{"query":"","cases":[]}"#)).await;

        assert_eq!(response.status_code, 400);
        assert_eq!(body(&response), json!({ "error": "Query is required" }));
    }

    #[tokio::test]
    async fn base64_bodies_are_decoded() {
        let provider = Arc::new(MockTextProvider::replying("Nothing on CASE-9."));
        let svc = service(provider.clone(), true);
        let payload = json!({
            "query": "Anything on CASE-9?",
            "cases": [{ "case_number": "CASE-9" }],
            "selectedCase": null
        });
        let event = FunctionEvent {
            http_method: "post".to_string(),
            body: Some(STANDARD.encode(payload.to_string())),
            is_base64_encoded: true,
            ..Default::default()
        };

        let response = handle_event(&svc, event).await;

        assert_eq!(response.status_code, 200);
        let body = body(&response);
        assert_eq!(body["metadata"]["caseIds"], json!(["CASE-9"]));
        assert_eq!(body["metadata"]["hasContext"], json!(false));
    }

    #[tokio::test]
    async fn selected_case_is_sent_as_context() {
        let provider = Arc::new(MockTextProvider::replying("FCRM-7 has 14 cash deposits."));
        let svc = service(provider.clone(), true);
        let selected = json!({
            "case_id": 7,
            "case_number": "FCRM-7",
            "summary": "Structured cash deposits",
            "status": "OPEN"
        });
        let payload = json!({
            "query": "Summarize the selected case",
            "cases": [selected, { "case_number": "FCRM-8" }],
            "selectedCase": selected
        });

        let response = handle_event(&svc, FunctionEvent::post(payload.to_string())).await;

        assert_eq!(response.status_code, 200);
        let body = body(&response);
        assert_eq!(body["metadata"]["hasContext"], json!(true));
        assert_eq!(body["metadata"]["caseIds"], json!(["FCRM-7"]));

        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("=== CURRENTLY SELECTED CASE ==="));
        assert!(prompt.contains("\"summary\": \"Structured cash deposits\""));
    }

    #[tokio::test]
    async fn missing_credential_still_answers_200() {
        let provider = Arc::new(MockTextProvider::replying("unused"));
        let svc = service(provider.clone(), false);

        let response = handle_event(&svc, FunctionEvent::post(r#"{"query":"hi"}"#)).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(body(&response)["metadata"], json!({ "error": "api_key_missing" }));
        assert_eq!(provider.calls(), 0);
    }
}
