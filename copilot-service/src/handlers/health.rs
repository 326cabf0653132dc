use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness plus a summary of the model configuration.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "model": state.assistant.model(),
        "api_key_configured": state.assistant.api_key_configured()
    }))
}

/// Readiness probe. The relay holds no connections, so it is ready once
/// it serves.
pub async fn readiness_check() -> StatusCode {
    StatusCode::OK
}
