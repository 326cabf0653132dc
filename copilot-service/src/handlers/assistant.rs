use crate::models::{QueryRequest, QueryResponse};
use crate::startup::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use service_core::error::AppError;

/// `POST /api/assistant/query`
///
/// Always answers 200 with a displayable `response`, except for a missing
/// query or an unreadable body.
pub async fn query_assistant(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected assistant query body");
        AppError::InvalidBody(anyhow::anyhow!(rejection.body_text()))
    })?;

    let response = state.assistant.answer(&request).await?;
    Ok(Json(response))
}
