use crate::models::Case;
use axum::Json;

/// `GET /api/fcrm/cases`
///
/// Case data is supplied by the frontend with each query; there is no case
/// store behind this service, so the listing is always empty.
pub async fn list_cases() -> Json<Vec<Case>> {
    Json(Vec::new())
}
